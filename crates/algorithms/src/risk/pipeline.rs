//! Single-run risk pipeline
//!
//! For every present factor, in canonical order: apply the validity mask,
//! align raw values to the run's reference shape, convert to risk and
//! summarize. The risk layers are then aggregated into the composite.

use super::composite::{composite, Composite};
use super::converters::convert;
use crate::align::align;
use satrisk_core::{AnalysisConfig, FactorData, Raster, RiskFactor};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Grid shape of the first factor processed in a run.
///
/// Set once, read by every later factor of the same run.
#[derive(Debug, Default)]
pub struct ReferenceShape(OnceLock<(usize, usize)>);

impl ReferenceShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference shape, fixing it to `candidate` if still unset
    pub fn get_or_set(&self, candidate: (usize, usize)) -> (usize, usize) {
        *self.0.get_or_init(|| candidate)
    }

    pub fn get(&self) -> Option<(usize, usize)> {
        self.0.get().copied()
    }
}

/// Raw data of the factors available for one run
#[derive(Debug, Clone, Default)]
pub struct FactorInputs(BTreeMap<RiskFactor, FactorData>);

impl FactorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, factor: RiskFactor, data: FactorData) {
        self.0.insert(factor, data);
    }

    pub fn get(&self, factor: RiskFactor) -> Option<&FactorData> {
        self.0.get(&factor)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Present factors in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, &FactorData)> {
        self.0.iter().map(|(f, d)| (*f, d))
    }
}

impl FromIterator<(RiskFactor, FactorData)> for FactorInputs {
    fn from_iter<I: IntoIterator<Item = (RiskFactor, FactorData)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Raw-index summary of one processed factor
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSummary {
    pub index: &'static str,
    pub raw_mean: f64,
    pub interpretation: String,
}

/// Everything one run of the pipeline produces
#[derive(Debug, Clone)]
pub struct RiskAssessment {
    pub composite: Composite,
    /// Per-factor risk layers at the reference shape
    pub layers: BTreeMap<RiskFactor, Raster<f64>>,
    pub summaries: BTreeMap<RiskFactor, IndexSummary>,
    pub reference_shape: Option<(usize, usize)>,
}

/// Run masking, alignment, conversion and aggregation over `inputs`.
///
/// Empty factor grids are skipped. With nothing left to process the
/// composite is the neutral placeholder of `config.default_shape`.
pub fn process_factors(inputs: &FactorInputs, config: &AnalysisConfig) -> RiskAssessment {
    let reference = ReferenceShape::new();
    let mut layers = BTreeMap::new();
    let mut summaries = BTreeMap::new();

    for (factor, data) in inputs.iter() {
        let raw = data.masked_values();
        if raw.is_empty() {
            tracing::warn!(factor = %factor, "empty grid, skipping");
            continue;
        }

        let shape = reference.get_or_set(raw.shape());
        let aligned = align(&raw, shape);

        let stats = aligned.statistics();
        tracing::debug!(
            factor = %factor,
            index = factor.index_label(),
            min = ?stats.min,
            max = ?stats.max,
            mean = ?stats.mean,
            valid = stats.valid_count,
            "raw index statistics"
        );

        let result = convert(factor, &aligned);
        summaries.insert(
            factor,
            IndexSummary {
                index: factor.index_label(),
                raw_mean: result.raw_mean,
                interpretation: result.interpretation.to_string(),
            },
        );
        layers.insert(factor, result.risk);
    }

    let stacked: Vec<(RiskFactor, Raster<f64>)> =
        layers.iter().map(|(f, r)| (*f, r.clone())).collect();
    let composite = composite(&stacked, config.default_shape);

    tracing::info!(
        factors = composite.factors.len(),
        mean = composite.mean,
        no_data = composite.no_data,
        "composite risk computed"
    );

    RiskAssessment {
        composite,
        layers,
        summaries,
        reference_shape: reference.get(),
    }
}
