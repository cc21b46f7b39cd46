//! Single-period analysis

use crate::error::{AnalysisError, Result};
use crate::report::{AnalysisReport, AreaInfo, PeriodAssessment};
use satrisk_acquire::{
    fetch_all, AcquireError, Acquisition, DateRange, DegradedFactor, FactorRequest, FactorSource,
    FetchOptions,
};
use satrisk_algorithms::risk::{process_factors, FactorInputs};
use satrisk_colormap::{colorize, risk_to_rgb, ColorRaster, ColorScheme};
use satrisk_core::area::image_dimensions;
use satrisk_core::{AnalysisConfig, Bounds, ImageSize, RiskFactor};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Run a full risk analysis for `bounds` over `period`.
///
/// Validates the area, picks a resolution from `config.current_tiers`,
/// fetches all six factors concurrently and scores them. Factors that fail
/// to download are replaced with synthetic data and listed in the report;
/// the call fails only when no factor could be fetched at all.
pub fn analyze(
    source: Arc<dyn FactorSource>,
    bounds: Bounds,
    period: DateRange,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    bounds.validate()?;
    let area_km2 = bounds.area_km2();
    let resolution_m = bounds.resolution_for(&config.current_tiers)?;
    let image = image_dimensions(&bounds, resolution_m as f64, config.max_image_dim);

    tracing::info!(
        area_km2,
        resolution_m,
        width = image.width,
        height = image.height,
        period = %period,
        "starting analysis"
    );

    let result = assess_period(source, &bounds, period, &image, config)?;

    Ok(AnalysisReport {
        area: AreaInfo {
            bounds,
            area_km2,
            resolution_m,
            image,
            period,
        },
        result,
    })
}

/// Fetch and score one period at a fixed image size.
pub(crate) fn assess_period(
    source: Arc<dyn FactorSource>,
    bounds: &Bounds,
    period: DateRange,
    image: &ImageSize,
    config: &AnalysisConfig,
) -> Result<PeriodAssessment> {
    let requests = FactorRequest::for_factors(
        &RiskFactor::ALL,
        *bounds,
        period,
        image,
        config.max_cloud_coverage,
    );

    let Acquisition { data, degraded } =
        match fetch_all(source, requests, &FetchOptions::from_config(config)) {
            Ok(acquisition) => acquisition,
            Err(AcquireError::AllFailed(n)) => {
                tracing::warn!(period = %period, factors = n, "every factor failed");
                return Err(AnalysisError::NoUsableData(period.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

    let inputs: FactorInputs = data.into_iter().collect();
    Ok(assess_inputs(period, &inputs, degraded, config))
}

/// Score already-acquired factor data.
pub fn assess_inputs(
    period: DateRange,
    inputs: &FactorInputs,
    degraded: Vec<DegradedFactor>,
    config: &AnalysisConfig,
) -> PeriodAssessment {
    let assessment = process_factors(inputs, config);
    let risk_image = risk_to_rgb(&assessment.composite.grid, config.scale_max);
    let factor_images = render_factors(inputs, config);

    PeriodAssessment {
        period,
        assessment,
        risk_image,
        factor_images,
        degraded,
    }
}

/// Render each factor's raw index with its configured visualization.
///
/// Uses the unmasked value channel so the image shows everything the
/// provider returned.
pub fn render_factors(
    inputs: &FactorInputs,
    config: &AnalysisConfig,
) -> BTreeMap<RiskFactor, ColorRaster> {
    inputs
        .iter()
        .map(|(factor, data)| {
            let viz = config.visualization_for(factor);
            let (min, max) = match viz.range {
                Some((lo, hi)) => (Some(lo), Some(hi)),
                None => (None, None),
            };
            let scheme = ColorScheme::from_name(&viz.scheme);
            (factor, colorize(&data.values(), scheme, true, min, max))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use satrisk_acquire::AcquireError;
    use satrisk_core::{FactorData, Raster};

    fn source<F>(f: F) -> Arc<dyn FactorSource>
    where
        F: Fn(&FactorRequest) -> satrisk_acquire::Result<FactorData> + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    fn rome() -> Bounds {
        Bounds::new(12.45, 41.85, 12.5, 41.9)
    }

    fn summer() -> DateRange {
        DateRange::parse("2024-06-01", "2024-08-31").unwrap()
    }

    fn fast_config() -> AnalysisConfig {
        AnalysisConfig {
            fetch_timeout_secs: 5,
            fallback_shape: (8, 8),
            ..AnalysisConfig::default()
        }
    }

    fn constant(value: f64) -> FactorData {
        FactorData::from_parts(&Raster::filled(8, 8, value), None).unwrap()
    }

    #[test]
    fn real_data_message() {
        let source = source(|_| Ok(constant(0.5)));
        let report = analyze(source, rome(), summer(), &fast_config()).unwrap();
        assert!(!report.result.using_fallback());
        assert_eq!(
            report.result.message(),
            "Analysis complete using real satellite data."
        );
        assert_eq!(report.result.factor_images.len(), 6);
        assert_eq!(report.result.risk_image.shape(), (8, 8));
    }

    #[test]
    fn degraded_factor_named_in_message() {
        let source = source(|req| {
            if req.factor == RiskFactor::BurnAreas {
                Err(AcquireError::NoData(req.factor))
            } else {
                Ok(constant(0.5))
            }
        });
        let report = analyze(source, rome(), summer(), &fast_config()).unwrap();
        assert!(report.result.using_fallback());
        assert!(report
            .result
            .message()
            .contains(RiskFactor::BurnAreas.description()));
    }

    #[test]
    fn all_failed_is_no_usable_data() {
        let source = source(|req| Err(AcquireError::NoData(req.factor)));
        let err = analyze(source, rome(), summer(), &fast_config()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoUsableData(_)));
    }

    #[test]
    fn invalid_bounds_rejected_before_fetching() {
        let source = source(|_| panic!("must not fetch"));
        let bad = Bounds::new(12.5, 41.9, 12.45, 41.85);
        assert!(matches!(
            analyze(source, bad, summer(), &fast_config()),
            Err(AnalysisError::Core(_))
        ));
    }

    #[test]
    fn render_uses_configured_scheme() {
        let mut inputs = FactorInputs::new();
        inputs.insert(RiskFactor::RoofRisk, constant(1.0));
        inputs.insert(RiskFactor::WaterStress, constant(0.0));
        let images = render_factors(&inputs, &AnalysisConfig::default());
        assert_eq!(images[&RiskFactor::RoofRisk].scheme(), "heat");
        assert_eq!(images[&RiskFactor::WaterStress].scheme(), "blue");
    }
}
