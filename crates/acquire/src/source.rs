//! Data providers

use crate::error::{AcquireError, Result};
use crate::request::FactorRequest;
use satrisk_core::io::read_factor_tiff;
use satrisk_core::FactorData;
use std::path::{Path, PathBuf};

/// Anything that can produce a factor's raw `[height, width, channels]` stack.
///
/// Implementations are called from worker threads, one per factor.
pub trait FactorSource: Send + Sync {
    fn fetch(&self, request: &FactorRequest) -> Result<FactorData>;

    /// Short label used in log events
    fn name(&self) -> &str {
        "source"
    }
}

impl<F> FactorSource for F
where
    F: Fn(&FactorRequest) -> Result<FactorData> + Send + Sync,
{
    fn fetch(&self, request: &FactorRequest) -> Result<FactorData> {
        self(request)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Reads pre-fetched stacks from `<root>/<source_id>.tif`.
///
/// A subdirectory named `<start>_<end>` after the request period takes
/// precedence, so one root can serve a trend run. Bounds and size are
/// ignored: the files are assumed to already cover the request.
#[derive(Debug, Clone)]
pub struct TiffDirectorySource {
    root: PathBuf,
}

impl TiffDirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, request: &FactorRequest) -> PathBuf {
        let file = format!("{}.tif", request.source_id());
        let period = &request.period;
        let period_dir = self.root.join(format!("{}_{}", period.start, period.end));
        if period_dir.is_dir() {
            period_dir.join(file)
        } else {
            self.root.join(file)
        }
    }
}

impl FactorSource for TiffDirectorySource {
    fn fetch(&self, request: &FactorRequest) -> Result<FactorData> {
        let path = self.path_for(request);
        if !path.is_file() {
            return Err(AcquireError::NoData(request.factor));
        }

        let data = read_factor_tiff(&path)?;
        let (rows, cols) = data.shape();
        if rows == 0 || cols == 0 {
            return Err(AcquireError::NoData(request.factor));
        }

        tracing::debug!(
            factor = %request.factor,
            path = %path.display(),
            rows,
            cols,
            channels = data.channels(),
            "loaded factor stack"
        );
        Ok(data)
    }

    fn name(&self) -> &str {
        "tiff-directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DateRange;
    use chrono::NaiveDate;
    use satrisk_core::io::write_factor_tiff;
    use satrisk_core::{Bounds, ImageSize, Raster, RiskFactor, ValidityMask};

    fn request(factor: RiskFactor) -> FactorRequest {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        FactorRequest::new(
            factor,
            Bounds::new(0.0, 0.0, 0.1, 0.1),
            DateRange::new(d(6, 1), d(8, 31)).unwrap(),
            &ImageSize {
                width: 4,
                height: 3,
                resolution_m: 20.0,
            },
            80,
        )
    }

    #[test]
    fn reads_file_named_after_source_id() {
        let dir = tempfile::tempdir().unwrap();
        let values = Raster::filled(3, 4, 0.25);
        let data = FactorData::from_parts(&values, Some(&ValidityMask::all_valid(3, 4))).unwrap();
        write_factor_tiff(&data, dir.path().join("burn_detection.tif")).unwrap();

        let source = TiffDirectorySource::new(dir.path());
        let got = source.fetch(&request(RiskFactor::BurnAreas)).unwrap();
        assert_eq!(got.shape(), (3, 4));
        assert_eq!(got.channels(), 2);
        assert_eq!(got.values().get(2, 3).unwrap(), 0.25);
    }

    #[test]
    fn period_directory_wins() {
        let dir = tempfile::tempdir().unwrap();
        let period_dir = dir.path().join("2024-06-01_2024-08-31");
        std::fs::create_dir(&period_dir).unwrap();
        for (root, value) in [(dir.path(), 0.1), (period_dir.as_path(), 0.9)] {
            let data = FactorData::from_parts(&Raster::filled(3, 4, value), None).unwrap();
            write_factor_tiff(&data, root.join("water_stress.tif")).unwrap();
        }

        let source = TiffDirectorySource::new(dir.path());
        let req = request(RiskFactor::WaterStress);
        assert_eq!(source.path_for(&req), period_dir.join("water_stress.tif"));
        let got = source.fetch(&req).unwrap();
        assert!((got.values().get(0, 0).unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = TiffDirectorySource::new(dir.path());
        assert!(matches!(
            source.fetch(&request(RiskFactor::RoofRisk)),
            Err(AcquireError::NoData(RiskFactor::RoofRisk))
        ));
    }

    #[test]
    fn closures_are_sources() {
        let source = |req: &FactorRequest| -> Result<FactorData> {
            let (w, h) = req.size;
            Ok(FactorData::from_parts(&Raster::filled(h, w, 0.1), None)?)
        };
        let got = source.fetch(&request(RiskFactor::WaterStress)).unwrap();
        assert_eq!(got.shape(), (3, 4));
    }
}
