//! # SatRisk Core
//!
//! Core types, configuration and I/O for the SatRisk risk pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: generic 2D grid type, plus `ValidityMask`
//! - `RiskFactor` and `FactorData`: the six spectral factors and their raw input
//! - `Bounds`: area-of-interest validation, area and pixel sizing
//! - `AnalysisConfig`: every caller-owned constant the pipeline depends on
//! - `json`: JSON-safe result trees
//! - TIFF I/O for factor stacks

pub mod area;
pub mod config;
pub mod error;
pub mod factor;
pub mod io;
pub mod json;
pub mod raster;

pub use area::{Bounds, ImageSize};
pub use config::{AnalysisConfig, ResolutionTiers, Visualization};
pub use error::{Error, Result};
pub use factor::{FactorData, RiskFactor};
pub use raster::{Raster, RasterElement, ValidityMask};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::area::Bounds;
    pub use crate::config::AnalysisConfig;
    pub use crate::error::{Error, Result};
    pub use crate::factor::{FactorData, RiskFactor};
    pub use crate::json::{sanitize, ToValue, Value};
    pub use crate::raster::{Raster, RasterElement, ValidityMask};
}
