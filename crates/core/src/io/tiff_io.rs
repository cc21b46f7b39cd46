//! TIFF reading/writing for factor stacks
//!
//! Uses the `tiff` crate. A factor file is either
//! - one page with interleaved samples (`[value, mask, ...]` per pixel), or
//! - one page per channel, all of the same size (value page first).
//!
//! Writing always produces one 32-bit float page per channel.

use crate::error::{Error, Result};
use crate::factor::FactorData;
use crate::raster::Raster;
use ndarray::{s, Array3, Axis};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;

/// Read a factor stack from a TIFF file
pub fn read_factor_tiff<P: AsRef<Path>>(path: P) -> Result<FactorData> {
    let file = File::open(path.as_ref())?;
    decode_stack(BufReader::new(file))
}

/// Read a factor stack from an in-memory TIFF
pub fn read_factor_tiff_from_buffer(data: &[u8]) -> Result<FactorData> {
    decode_stack(Cursor::new(data))
}

/// Read only the first channel of a TIFF as a raster
pub fn read_raster_tiff<P: AsRef<Path>>(path: P) -> Result<Raster<f64>> {
    Ok(read_factor_tiff(path)?.values())
}

/// Internal: decode every page of a TIFF into one `[rows, cols, channels]` stack
fn decode_stack<R: Read + Seek>(reader: R) -> Result<FactorData> {
    let mut decoder = Decoder::new(reader)?;
    let (rows, cols) = page_dims(&mut decoder)?;
    let mut stack = decode_page(&mut decoder, rows, cols)?;

    while decoder.more_images() {
        decoder.next_image()?;
        let (r, c) = page_dims(&mut decoder)?;
        if (r, c) != (rows, cols) {
            tracing::debug!(rows = r, cols = c, "skipping TIFF page with different size");
            continue;
        }
        let page = decode_page(&mut decoder, rows, cols)?;
        stack = ndarray::concatenate(Axis(2), &[stack.view(), page.view()])
            .map_err(|e| Error::Other(e.to_string()))?;
    }

    FactorData::new(stack)
}

fn page_dims<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<(usize, usize)> {
    let (width, height) = decoder.dimensions()?;
    Ok((height as usize, width as usize))
}

fn decode_page<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    rows: usize,
    cols: usize,
) -> Result<Array3<f64>> {
    let data: Vec<f64> = match decoder.read_image()? {
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    let pixels = rows * cols;
    if pixels == 0 || data.len() % pixels != 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }
    let samples = data.len() / pixels;

    Array3::from_shape_vec((rows, cols, samples), data).map_err(|e| Error::Other(e.to_string()))
}

/// Write a factor stack, one float page per channel
pub fn write_factor_tiff<P: AsRef<Path>>(data: &FactorData, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_stack(data, file)
}

/// Write a factor stack to an in-memory TIFF
pub fn write_factor_tiff_to_buffer(data: &FactorData) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_stack(data, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Write a single raster as a one-page float TIFF
pub fn write_raster_tiff<P: AsRef<Path>>(raster: &Raster<f64>, path: P) -> Result<()> {
    write_factor_tiff(&FactorData::from_parts(raster, None)?, path)
}

/// Internal: encode every channel as its own Gray32Float page
fn encode_stack<W: Write + Seek>(data: &FactorData, writer: W) -> Result<()> {
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = data.shape();

    for channel in 0..data.channels() {
        let page: Vec<f32> = data
            .stack()
            .slice(s![.., .., channel])
            .iter()
            .map(|&v| v as f32)
            .collect();
        encoder.write_image::<Gray32Float>(cols as u32, rows as u32, &page)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ValidityMask;

    #[test]
    fn single_page_round_trip() {
        let values = Raster::from_vec(vec![0.25, -0.5, 1.0, f64::NAN, 0.0, 0.75], 2, 3).unwrap();
        let data = FactorData::from_parts(&values, None).unwrap();
        let buf = write_factor_tiff_to_buffer(&data).unwrap();

        let back = read_factor_tiff_from_buffer(&buf).unwrap();
        assert_eq!(back.shape(), (2, 3));
        assert_eq!(back.channels(), 1);
        assert_eq!(back.values().get(0, 1).unwrap(), -0.5);
        assert!(back.values().get(1, 0).unwrap().is_nan());
    }

    #[test]
    fn mask_page_round_trip() {
        let values = Raster::from_vec(vec![0.1, 0.2, 0.3, 0.4], 2, 2).unwrap();
        let mask = ValidityMask::from_channel(&Raster::from_vec(vec![1.0, 1.0, 0.0, 1.0], 2, 2).unwrap());
        let data = FactorData::from_parts(&values, Some(&mask)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veg_health.tif");
        write_factor_tiff(&data, &path).unwrap();

        let back = read_factor_tiff(&path).unwrap();
        assert_eq!(back.channels(), 2);
        assert_eq!(back.mask().unwrap(), mask);
        assert!(back.masked_values().get(1, 0).unwrap().is_nan());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(read_factor_tiff_from_buffer(b"not a tiff").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            read_factor_tiff("/definitely/not/here.tif"),
            Err(Error::Io(_))
        ));
    }
}
