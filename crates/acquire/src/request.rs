//! Request descriptors

use crate::error::{AcquireError, Result};
use chrono::NaiveDate;
use satrisk_core::{Bounds, ImageSize, RiskFactor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive acquisition window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AcquireError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
                AcquireError::Core(satrisk_core::Error::InvalidParameter {
                    name: "date",
                    value: s.to_string(),
                    reason: e.to_string(),
                })
            })
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Everything a data provider needs to produce one factor's raw stack.
///
/// `factor.source_id()` names both the processing script and the output
/// requested from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRequest {
    pub factor: RiskFactor,
    pub bounds: Bounds,
    pub period: DateRange,
    /// Metres per pixel
    pub resolution_m: f64,
    /// Output size in pixels as (width, height)
    pub size: (usize, usize),
    /// Maximum cloud coverage percentage
    pub max_cloud_coverage: u8,
}

impl FactorRequest {
    pub fn new(
        factor: RiskFactor,
        bounds: Bounds,
        period: DateRange,
        image: &ImageSize,
        max_cloud_coverage: u8,
    ) -> Self {
        Self {
            factor,
            bounds,
            period,
            resolution_m: image.resolution_m,
            size: (image.width, image.height),
            max_cloud_coverage,
        }
    }

    /// One request per factor in `factors`, otherwise identical.
    pub fn for_factors(
        factors: &[RiskFactor],
        bounds: Bounds,
        period: DateRange,
        image: &ImageSize,
        max_cloud_coverage: u8,
    ) -> Vec<Self> {
        factors
            .iter()
            .map(|&f| Self::new(f, bounds, period, image, max_cloud_coverage))
            .collect()
    }

    pub fn source_id(&self) -> &'static str {
        self.factor.source_id()
    }
}
