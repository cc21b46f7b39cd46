//! Grid-to-RGB rendering.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use image::{ImageFormat, RgbImage};
use ndarray::{Array2, Array3, ArrayViewD, Ix2};
use satrisk_core::{Error, Raster, Result};
use std::io::Cursor;
use std::path::Path;

/// Identifier of the green-to-red risk gradient.
pub const RISK_GRADIENT: &str = "risk_gradient";

/// An RGB image, `[rows, cols, 3]`, tagged with the scheme that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRaster {
    pixels: Array3<u8>,
    scheme: &'static str,
}

impl ColorRaster {
    fn from_fn<F>(shape: (usize, usize), scheme: &'static str, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let (rows, cols) = shape;
        let mut pixels = Array3::<u8>::zeros((rows, cols, 3));
        for row in 0..rows {
            for col in 0..cols {
                let Rgb { r, g, b } = f(row, col);
                pixels[(row, col, 0)] = r;
                pixels[(row, col, 1)] = g;
                pixels[(row, col, 2)] = b;
            }
        }
        Self { pixels, scheme }
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        let (rows, cols, _) = self.pixels.dim();
        (rows, cols)
    }

    /// Identifier of the scheme or gradient used
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    pub fn pixels(&self) -> &Array3<u8> {
        &self.pixels
    }

    pub fn into_pixels(self) -> Array3<u8> {
        self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb> {
        let (rows, cols) = self.shape();
        if row >= rows || col >= cols {
            return None;
        }
        Some(Rgb::new(
            self.pixels[(row, col, 0)],
            self.pixels[(row, col, 1)],
            self.pixels[(row, col, 2)],
        ))
    }

    /// Encode as an 8-bit RGB PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let (rows, cols) = self.shape();
        let raw: Vec<u8> = self.pixels.iter().copied().collect();
        let img = RgbImage::from_raw(cols as u32, rows as u32, raw).ok_or(
            Error::InvalidDimensions {
                width: cols,
                height: rows,
            },
        )?;

        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| Error::Other(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }

    /// Write the PNG encoding to `path`
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_png()?)?;
        Ok(())
    }
}

/// NaN → 0, +inf → 255, −inf → 0.
#[inline]
fn preprocess(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else if v == f64::INFINITY {
        255.0
    } else if v == f64::NEG_INFINITY {
        0.0
    } else {
        v
    }
}

/// `min(max(v, lo), hi)`; unlike `f64::clamp` this tolerates `lo > hi`.
#[inline]
fn clip(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// 8-bit intensities of `grid` after preprocessing and optional normalization.
///
/// With `normalize`, values are clipped to `[min_val, max_val]` (each
/// defaulting to the preprocessed data's own extreme) and rescaled onto
/// 0..=255; a zero-width range maps everything to 0. Without it, values are
/// clipped to 0..=255 directly. Fractions are truncated.
pub fn intensities(
    grid: &Raster<f64>,
    normalize: bool,
    min_val: Option<f64>,
    max_val: Option<f64>,
) -> Array2<u8> {
    let clean = grid.data().mapv(preprocess);

    if !normalize {
        return clean.mapv(|v| clip(v, 0.0, 255.0) as u8);
    }

    let lo = min_val.unwrap_or_else(|| clean.iter().copied().fold(f64::INFINITY, f64::min));
    let hi = max_val.unwrap_or_else(|| clean.iter().copied().fold(f64::NEG_INFINITY, f64::max));

    if hi == lo || clean.is_empty() {
        return Array2::zeros(clean.dim());
    }

    let span = hi - lo;
    clean.mapv(|v| ((clip(v, lo, hi) - lo) / span * 255.0) as u8)
}

/// Render `grid` with `scheme`. See [`intensities`] for value handling.
pub fn colorize(
    grid: &Raster<f64>,
    scheme: ColorScheme,
    normalize: bool,
    min_val: Option<f64>,
    max_val: Option<f64>,
) -> ColorRaster {
    let levels = intensities(grid, normalize, min_val, max_val);
    ColorRaster::from_fn(levels.dim(), scheme.name(), |r, c| {
        evaluate(scheme, levels[(r, c)])
    })
}

fn as_grid(array: ArrayViewD<'_, f64>) -> Result<Raster<f64>> {
    let shape = array.shape().to_vec();
    array
        .into_dimensionality::<Ix2>()
        .map(|view| Raster::from_array(view.to_owned()))
        .map_err(|_| Error::InvalidShape {
            expected: 2,
            actual: shape,
        })
}

/// [`colorize`] for arrays of unchecked rank; anything but 2-D is rejected.
pub fn colorize_array(
    array: ArrayViewD<'_, f64>,
    scheme: ColorScheme,
    normalize: bool,
    min_val: Option<f64>,
    max_val: Option<f64>,
) -> Result<ColorRaster> {
    let grid = as_grid(array)?;
    Ok(colorize(&grid, scheme, normalize, min_val, max_val))
}

/// Render a risk grid as a green (0) to red (`scale_max`) gradient.
///
/// NaN reads as the middle of the scale, +inf as `scale_max`, −inf as 0.
pub fn risk_to_rgb(grid: &Raster<f64>, scale_max: f64) -> ColorRaster {
    let level = |v: f64| -> u8 {
        let v = if v.is_nan() {
            scale_max / 2.0
        } else if v == f64::INFINITY {
            scale_max
        } else if v == f64::NEG_INFINITY {
            0.0
        } else {
            v
        };
        (clip(v / scale_max, 0.0, 1.0) * 255.0) as u8
    };

    ColorRaster::from_fn(grid.shape(), RISK_GRADIENT, |r, c| {
        // SAFETY: from_fn only visits cells inside grid.shape()
        let red = level(unsafe { grid.get_unchecked(r, c) });
        Rgb::new(red, 255 - red, 0)
    })
}

/// [`risk_to_rgb`] for arrays of unchecked rank; anything but 2-D is rejected.
pub fn risk_to_rgb_array(array: ArrayViewD<'_, f64>, scale_max: f64) -> Result<ColorRaster> {
    let grid = as_grid(array)?;
    Ok(risk_to_rgb(&grid, scale_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3 as A3};

    fn grid(values: Vec<f64>, rows: usize, cols: usize) -> Raster<f64> {
        Raster::from_vec(values, rows, cols).unwrap()
    }

    #[test]
    fn red_scheme_without_normalization() {
        let img = colorize(&grid(vec![0.0, 128.0, 255.0, 64.0], 2, 2), ColorScheme::Red, false, None, None);
        assert_eq!(img.shape(), (2, 2));
        assert_eq!(img.pixel(0, 0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(img.pixel(0, 1), Some(Rgb::new(128, 0, 0)));
        assert_eq!(img.pixel(1, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(img.pixel(1, 1), Some(Rgb::new(64, 0, 0)));
        assert_eq!(img.scheme(), "red");
    }

    #[test]
    fn normalize_with_explicit_range() {
        let g = grid(vec![0.0, 10.0], 1, 2);
        assert_eq!(intensities(&g, true, Some(0.0), Some(10.0)), array![[0u8, 255]]);
        // degenerate range
        assert_eq!(intensities(&g, true, Some(5.0), Some(5.0)), array![[0u8, 0]]);
    }

    #[test]
    fn normalize_uses_data_range_by_default() {
        let g = grid(vec![-1.0, 0.0, 1.0], 1, 3);
        assert_eq!(intensities(&g, true, None, None), array![[0u8, 127, 255]]);
    }

    #[test]
    fn constant_grid_normalizes_to_zero() {
        let g = Raster::filled(3, 3, 0.42);
        assert!(intensities(&g, true, None, None).iter().all(|&v| v == 0));
    }

    #[test]
    fn non_finite_preprocessing() {
        let g = grid(vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 300.0, -4.0, 12.9], 1, 6);
        assert_eq!(intensities(&g, false, None, None), array![[0u8, 255, 0, 255, 0, 12]]);
    }

    #[test]
    fn nan_counts_as_zero_in_data_range() {
        let g = grid(vec![f64::NAN, 2.0, 4.0], 1, 3);
        // range becomes 0..4
        assert_eq!(intensities(&g, true, None, None), array![[0u8, 127, 255]]);
    }

    #[test]
    fn colorize_array_rejects_other_ranks() {
        let cube = A3::<f64>::zeros((2, 2, 2));
        let err = colorize_array(cube.view().into_dyn(), ColorScheme::Gray, false, None, None);
        assert!(matches!(err, Err(Error::InvalidShape { expected: 2, .. })));

        let flat = ndarray::Array1::<f64>::zeros(4);
        assert!(risk_to_rgb_array(flat.view().into_dyn(), 10.0).is_err());

        let ok = colorize_array(array![[1.0, 2.0]].view().into_dyn(), ColorScheme::Gray, false, None, None);
        assert_eq!(ok.unwrap().pixel(0, 1), Some(Rgb::new(2, 2, 2)));
    }

    #[test]
    fn risk_gradient() {
        let g = grid(vec![0.0, 10.0, 5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 15.0, -3.0], 2, 4);
        let img = risk_to_rgb(&g, 10.0);
        assert_eq!(img.scheme(), RISK_GRADIENT);
        assert_eq!(img.pixel(0, 0), Some(Rgb::new(0, 255, 0)));
        assert_eq!(img.pixel(0, 1), Some(Rgb::new(255, 0, 0)));
        assert_eq!(img.pixel(0, 2), Some(Rgb::new(127, 128, 0)));
        assert_eq!(img.pixel(0, 3), Some(Rgb::new(127, 128, 0)));
        assert_eq!(img.pixel(1, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(img.pixel(1, 1), Some(Rgb::new(0, 255, 0)));
        assert_eq!(img.pixel(1, 2), Some(Rgb::new(255, 0, 0)));
        assert_eq!(img.pixel(1, 3), Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn output_does_not_alias_input() {
        let mut g = Raster::filled(2, 2, 100.0);
        let img = colorize(&g, ColorScheme::Gray, false, None, None);
        g.set(0, 0, 0.0).unwrap();
        assert_eq!(img.pixel(0, 0), Some(Rgb::new(100, 100, 100)));
    }

    #[test]
    fn png_encoding() {
        let img = colorize(&Raster::filled(3, 5, 200.0), ColorScheme::Heat, false, None, None);
        let png = img.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(4, 2).0, [255, 90, 0]);
    }

    #[test]
    fn write_png_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk.png");
        risk_to_rgb(&Raster::filled(4, 4, 7.0), 10.0).write_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 8);
    }
}
