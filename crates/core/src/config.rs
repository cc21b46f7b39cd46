//! Analysis configuration owned by the caller.
//!
//! Every constant the pipeline depends on lives here rather than in the
//! algorithms, and the whole struct round-trips through JSON so deployments
//! can override individual values.

use crate::error::Result;
use crate::factor::RiskFactor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One resolution step: areas strictly below `below_km2` use `resolution_m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionTier {
    pub below_km2: f64,
    pub resolution_m: u32,
}

/// Area-size dependent resolution table plus the hard area cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionTiers {
    /// Ascending by `below_km2`.
    pub tiers: Vec<ResolutionTier>,
    /// Resolution for areas above every tier.
    pub fallback_m: u32,
    /// Largest area accepted at all.
    pub max_area_km2: f64,
}

impl ResolutionTiers {
    /// Tiers for a single-period analysis.
    pub fn current() -> Self {
        Self {
            tiers: vec![
                ResolutionTier { below_km2: 100.0, resolution_m: 20 },
                ResolutionTier { below_km2: 1000.0, resolution_m: 30 },
                ResolutionTier { below_km2: 5000.0, resolution_m: 60 },
            ],
            fallback_m: 100,
            max_area_km2: 10_000.0,
        }
    }

    /// Coarser tiers for trend runs, which issue one request set per period.
    pub fn trend() -> Self {
        Self {
            tiers: vec![
                ResolutionTier { below_km2: 100.0, resolution_m: 30 },
                ResolutionTier { below_km2: 1000.0, resolution_m: 60 },
            ],
            fallback_m: 100,
            max_area_km2: 5_000.0,
        }
    }

    pub fn resolution_for(&self, area_km2: f64) -> u32 {
        self.tiers
            .iter()
            .find(|t| area_km2 < t.below_km2)
            .map(|t| t.resolution_m)
            .unwrap_or(self.fallback_m)
    }
}

/// How one factor's raw index is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    /// Color scheme name (see the colormap crate); unknown names render gray.
    pub scheme: String,
    /// Fixed normalization range; `None` uses the data's own min/max.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl Visualization {
    pub fn new(scheme: &str, range: Option<(f64, f64)>) -> Self {
        Self {
            scheme: scheme.to_string(),
            range,
        }
    }
}

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub current_tiers: ResolutionTiers,
    pub trend_tiers: ResolutionTiers,
    /// Largest image side the data provider accepts, in pixels.
    pub max_image_dim: usize,
    /// Maximum cloud coverage percentage forwarded to the data provider.
    pub max_cloud_coverage: u8,
    /// Per-factor deadline for acquisition, in seconds.
    pub fetch_timeout_secs: u64,
    /// Upper end of the composite risk color ramp.
    pub scale_max: f64,
    /// Shape of the neutral composite when no factor is available.
    pub default_shape: (usize, usize),
    /// Shape of synthetic fallback data, (rows, cols).
    pub fallback_shape: (usize, usize),
    /// Length of each trend bucket in months.
    pub trend_window_months: u32,
    pub visualization: BTreeMap<RiskFactor, Visualization>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let visualization = BTreeMap::from([
            (RiskFactor::VegetationHealth, Visualization::new("green", Some((-1.0, 1.0)))),
            (RiskFactor::WaterStress, Visualization::new("blue", Some((-1.0, 1.0)))),
            (RiskFactor::UrbanAreas, Visualization::new("purple", Some((-1.0, 1.0)))),
            (RiskFactor::BurnAreas, Visualization::new("red", Some((-1.0, 1.0)))),
            (RiskFactor::RoofRisk, Visualization::new("heat", None)),
            (RiskFactor::DrainageRisk, Visualization::new("blue_to_brown", Some((-1.0, 1.0)))),
        ]);

        Self {
            current_tiers: ResolutionTiers::current(),
            trend_tiers: ResolutionTiers::trend(),
            max_image_dim: 2500,
            max_cloud_coverage: 80,
            fetch_timeout_secs: 120,
            scale_max: 10.0,
            default_shape: (256, 256),
            fallback_shape: (256, 256),
            trend_window_months: 3,
            visualization,
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Visualization for `factor`, gray over the data range if unconfigured.
    pub fn visualization_for(&self, factor: RiskFactor) -> Visualization {
        self.visualization
            .get(&factor)
            .cloned()
            .unwrap_or_else(|| Visualization::new("gray", None))
    }
}
