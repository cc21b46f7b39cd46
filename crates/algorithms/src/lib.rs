//! # SatRisk Algorithms
//!
//! Numeric stages of the risk pipeline.
//!
//! - **align**: order-1 resampling of a grid onto a reference shape
//! - **risk**: the six index risk converters, interpretation tables,
//!   the composite aggregator and the single-run pipeline

pub mod align;
pub(crate) mod maybe_rayon;
pub mod risk;

pub use align::align;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::align::align;
    pub use crate::risk::{
        composite, convert, interpret, process_factors, Composite, FactorInputs, FactorRisk,
        IndexSummary, ReferenceShape, RiskAssessment, RiskFactorSet,
    };
    pub use satrisk_core::prelude::*;
}
