//! Trend analysis over a sequence of time buckets

use crate::analyze::assess_period;
use crate::error::{AnalysisError, Result};
use crate::mode::ProcessingMode;
use crate::report::{AreaInfo, PeriodAssessment, TrendReport};
use chrono::{Months, NaiveDate};
use satrisk_acquire::{DateRange, FactorSource};
use satrisk_core::area::image_dimensions;
use satrisk_core::{AnalysisConfig, Bounds};
use std::sync::Arc;

/// Trend run settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendOptions {
    /// Months between the starts of consecutive buckets
    pub interval_months: u32,
    /// How buckets are scheduled
    pub mode: ProcessingMode,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            interval_months: 6,
            mode: ProcessingMode::default(),
        }
    }
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Split `range` into acquisition buckets.
///
/// Buckets start at `range.start` and every `interval_months` after it
/// while the start is still within the range. Each bucket lasts
/// `window_months`, clipped to `range.end`. An interval of zero is treated
/// as one month.
pub fn trend_periods(range: &DateRange, interval_months: u32, window_months: u32) -> Vec<DateRange> {
    let step = interval_months.max(1);
    let mut periods = Vec::new();
    let mut start = range.start;

    while start <= range.end {
        let end = add_months(start, window_months)
            .map_or(range.end, |d| d.min(range.end));
        periods.push(DateRange { start, end });
        match add_months(start, step) {
            Some(next) => start = next,
            None => break,
        }
    }
    periods
}

/// Analyze each bucket of `range` independently.
///
/// Uses the coarser `config.trend_tiers`. A bucket that yields no usable
/// data is logged and skipped; the run fails only if every bucket did.
pub fn analyze_trend(
    source: Arc<dyn FactorSource>,
    bounds: Bounds,
    range: DateRange,
    options: &TrendOptions,
    config: &AnalysisConfig,
) -> Result<TrendReport> {
    if range.start >= range.end {
        return Err(AnalysisError::InvalidDateRange {
            start: range.start.to_string(),
            end: range.end.to_string(),
        });
    }
    bounds.validate()?;
    let area_km2 = bounds.area_km2();
    let resolution_m = bounds.resolution_for(&config.trend_tiers)?;
    let image = image_dimensions(&bounds, resolution_m as f64, config.max_image_dim);

    let periods = trend_periods(&range, options.interval_months, config.trend_window_months);
    tracing::info!(
        periods = periods.len(),
        interval_months = options.interval_months,
        resolution_m,
        "starting trend analysis"
    );

    let outcomes = options.mode.map(&periods, |period| {
        let _span = tracing::debug_span!("trend_period", period = %period).entered();
        assess_period(Arc::clone(&source), &bounds, *period, &image, config)
    });

    let mut assessed: Vec<PeriodAssessment> = Vec::new();
    let mut skipped = Vec::new();
    for (period, outcome) in periods.iter().zip(outcomes) {
        match outcome {
            Ok(result) => assessed.push(result),
            Err(e) => {
                tracing::warn!(period = %period, error = %e, "skipping period");
                skipped.push((*period, e.to_string()));
            }
        }
    }

    if assessed.is_empty() {
        return Err(AnalysisError::NoPeriodData(periods.len()));
    }

    Ok(TrendReport {
        area: AreaInfo {
            bounds,
            area_km2,
            resolution_m,
            image,
            period: range,
        },
        interval_months: options.interval_months,
        periods: assessed,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[test]
    fn one_year_in_half_year_steps() {
        let periods = trend_periods(&range("2023-01-01", "2023-12-31"), 6, 3);
        assert_eq!(
            periods,
            vec![
                range("2023-01-01", "2023-04-01"),
                range("2023-07-01", "2023-10-01"),
            ]
        );
    }

    #[test]
    fn last_bucket_clipped_to_end() {
        let periods = trend_periods(&range("2023-01-01", "2023-08-15"), 6, 3);
        assert_eq!(periods.last(), Some(&range("2023-07-01", "2023-08-15")));
    }

    #[test]
    fn bucket_starting_on_end_date_is_kept() {
        let periods = trend_periods(&range("2023-01-01", "2023-07-01"), 6, 3);
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[1], range("2023-07-01", "2023-07-01"));
    }

    #[test]
    fn zero_interval_does_not_loop_forever() {
        let periods = trend_periods(&range("2023-01-01", "2023-03-31"), 0, 1);
        assert_eq!(periods.len(), 3);
    }

    #[test]
    fn equal_dates_rejected() {
        let source: Arc<dyn FactorSource> = Arc::new(TrendNever);
        let err = analyze_trend(
            source,
            Bounds::new(12.45, 41.85, 12.5, 41.9),
            range("2023-01-01", "2023-01-01"),
            &TrendOptions::default(),
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDateRange { .. }));
    }

    struct TrendNever;

    impl FactorSource for TrendNever {
        fn fetch(
            &self,
            _: &satrisk_acquire::FactorRequest,
        ) -> satrisk_acquire::Result<satrisk_core::FactorData> {
            unreachable!("date validation happens first")
        }
    }
}
