//! # SatRisk Analysis
//!
//! End-to-end risk analysis built on the acquisition, scoring and
//! rendering crates.
//!
//! - [`analyze`]: one period, all six factors, degraded factors reported
//! - [`analyze_trend`]: the same analysis over a sequence of time buckets
//! - [`narrative`]: risk levels, recommendations and trend summaries
//!
//! Reports implement [`ToValue`](satrisk_core::json::ToValue) so they can be
//! serialized with every non-finite number replaced.

mod analyze;
pub mod error;
mod mode;
pub mod narrative;
mod report;
mod trend;

pub use analyze::{analyze, assess_inputs, render_factors};
pub use error::{AnalysisError, Result};
pub use mode::ProcessingMode;
pub use report::{AnalysisReport, AreaInfo, PeriodAssessment, TrendReport};
pub use trend::{analyze_trend, trend_periods, TrendOptions};
