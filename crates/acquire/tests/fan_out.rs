//! Fan-out against a directory of factor TIFFs

use chrono::NaiveDate;
use satrisk_acquire::{fetch_all, DateRange, FactorRequest, FetchOptions, TiffDirectorySource};
use satrisk_core::io::write_factor_tiff;
use satrisk_core::{Bounds, FactorData, ImageSize, Raster, RiskFactor, ValidityMask};
use std::sync::Arc;
use std::time::Duration;

fn write_factor(dir: &std::path::Path, factor: RiskFactor, value: f64) {
    let values = Raster::filled(5, 7, value);
    let data = FactorData::from_parts(&values, Some(&ValidityMask::all_valid(5, 7))).unwrap();
    write_factor_tiff(&data, dir.join(format!("{}.tif", factor.source_id()))).unwrap();
}

#[test]
fn partial_directory_degrades_missing_factors() {
    let dir = tempfile::tempdir().unwrap();
    write_factor(dir.path(), RiskFactor::VegetationHealth, 0.7);
    write_factor(dir.path(), RiskFactor::DrainageRisk, -0.3);

    let period = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
    )
    .unwrap();
    let image = ImageSize {
        width: 7,
        height: 5,
        resolution_m: 20.0,
    };
    let requests =
        FactorRequest::for_factors(&RiskFactor::ALL, Bounds::new(12.4, 41.8, 12.5, 41.9), period, &image, 80);

    let options = FetchOptions {
        timeout: Duration::from_secs(10),
        fallback_shape: (16, 16),
    };
    let out = fetch_all(Arc::new(TiffDirectorySource::new(dir.path())), requests, &options).unwrap();

    assert_eq!(out.data.len(), 6);
    let degraded: Vec<_> = out.degraded_factors().collect();
    assert_eq!(
        degraded,
        vec![
            RiskFactor::WaterStress,
            RiskFactor::UrbanAreas,
            RiskFactor::BurnAreas,
            RiskFactor::RoofRisk,
        ]
    );

    let veg = &out.data[&RiskFactor::VegetationHealth];
    assert_eq!(veg.shape(), (5, 7));
    assert!((veg.values().get(0, 0).unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(out.data[&RiskFactor::UrbanAreas].shape(), (16, 16));
}

#[test]
fn empty_directory_fails_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let period = DateRange::parse("2024-01-01", "2024-03-31").unwrap();
    let image = ImageSize {
        width: 4,
        height: 4,
        resolution_m: 30.0,
    };
    let requests =
        FactorRequest::for_factors(&RiskFactor::ALL, Bounds::new(0.0, 0.0, 1.0, 1.0), period, &image, 80);
    let result = fetch_all(
        Arc::new(TiffDirectorySource::new(dir.path())),
        requests,
        &FetchOptions::default(),
    );
    assert!(result.is_err());
}
