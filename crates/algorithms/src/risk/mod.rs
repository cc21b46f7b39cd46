//! Index-to-risk conversion and aggregation
//!
//! Each factor's raw spectral index is mapped onto a small set of risk
//! scores on the 1 (safe) to 10 (critical) scale. Scores of all present
//! factors are then averaged into the composite risk layer.

mod composite;
mod converters;
mod interpret;
mod pipeline;

pub use composite::{composite, Composite, RiskFactorSet, NEUTRAL_RISK};
pub use converters::{
    burn_risk, convert, drainage_risk, roof_risk, urban_risk, vegetation_risk, water_risk,
    FactorRisk, TierRule, BURN_RULE, DRAINAGE_RULE, URBAN_RULE, VEGETATION_RULE, WATER_RULE,
};
pub use interpret::{interpret, ROOF_INTERPRETATION};
pub use pipeline::{process_factors, FactorInputs, IndexSummary, ReferenceShape, RiskAssessment};
