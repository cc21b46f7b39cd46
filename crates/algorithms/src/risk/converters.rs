//! The six index risk converters
//!
//! Five factors use fixed threshold tiers on the raw index. Roof risk has no
//! physical scale, so it is min-max normalized over the grid instead.

use super::interpret::interpret;
use crate::maybe_rayon::*;
use ndarray::Array2;
use satrisk_core::{Raster, RiskFactor};

/// Risk layer of one factor plus its raw-index summary
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRisk {
    pub factor: RiskFactor,
    /// Per-pixel risk score
    pub risk: Raster<f64>,
    /// Mean of the finite raw index cells, `0.0` when there are none
    pub raw_mean: f64,
    pub interpretation: &'static str,
}

/// Threshold table: the first tier whose threshold the value strictly
/// exceeds wins, anything else (including NaN) gets `otherwise`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRule {
    /// `(threshold, risk)` in descending threshold order
    pub tiers: &'static [(f64, f64)],
    pub otherwise: f64,
}

impl TierRule {
    /// Risk score for one raw value
    #[inline]
    pub fn classify(&self, value: f64) -> f64 {
        self.tiers
            .iter()
            .find(|(threshold, _)| value > *threshold)
            .map(|(_, risk)| *risk)
            .unwrap_or(self.otherwise)
    }

    /// Every score this rule can produce
    pub fn tier_set(&self) -> Vec<f64> {
        let mut set: Vec<f64> = self.tiers.iter().map(|(_, r)| *r).collect();
        set.push(self.otherwise);
        set
    }

    /// Apply the rule to every cell
    pub fn apply(&self, grid: &Raster<f64>) -> Raster<f64> {
        map_rows(grid, |v| self.classify(v))
    }
}

/// Dense vegetation is the lowest risk.
pub const VEGETATION_RULE: TierRule = TierRule {
    tiers: &[(0.6, 3.0), (0.2, 5.0)],
    otherwise: 7.0,
};

/// High moisture is the lowest risk.
pub const WATER_RULE: TierRule = TierRule {
    tiers: &[(0.3, 3.0), (-0.1, 5.0)],
    otherwise: 8.0,
};

/// Built-up density raises risk.
pub const URBAN_RULE: TierRule = TierRule {
    tiers: &[(0.1, 7.0), (-0.2, 4.0)],
    otherwise: 2.0,
};

/// High NBR means healthy, unburned vegetation.
pub const BURN_RULE: TierRule = TierRule {
    tiers: &[(0.3, 2.0), (0.1, 5.0)],
    otherwise: 8.0,
};

pub const DRAINAGE_RULE: TierRule = TierRule {
    tiers: &[(0.2, 3.0), (-0.1, 6.0)],
    otherwise: 9.0,
};

/// Score for roof cells without a usable value, and for grids with no spread.
const ROOF_NEUTRAL: f64 = 5.0;

/// Row-parallel cell map
fn map_rows<F>(grid: &Raster<f64>, f: F) -> Raster<f64>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let (rows, cols) = grid.shape();
    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0.0; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                // SAFETY: row < rows, col < cols
                *out = f(unsafe { grid.get_unchecked(row, col) });
            }
            row_data
        })
        .collect();

    match Array2::from_shape_vec((rows, cols), data) {
        Ok(array) => Raster::from_array(array),
        Err(_) => grid.map(f),
    }
}

fn finite_mean(grid: &Raster<f64>) -> f64 {
    grid.valid_mean().unwrap_or(0.0)
}

fn tiered(factor: RiskFactor, rule: &TierRule, grid: &Raster<f64>) -> FactorRisk {
    let raw_mean = finite_mean(grid);
    FactorRisk {
        factor,
        risk: rule.apply(grid),
        raw_mean,
        interpretation: interpret(factor, raw_mean),
    }
}

/// NDVI → {3, 5, 7}
pub fn vegetation_risk(grid: &Raster<f64>) -> FactorRisk {
    tiered(RiskFactor::VegetationHealth, &VEGETATION_RULE, grid)
}

/// NDMI → {3, 5, 8}
pub fn water_risk(grid: &Raster<f64>) -> FactorRisk {
    tiered(RiskFactor::WaterStress, &WATER_RULE, grid)
}

/// NDBI → {2, 4, 7}
pub fn urban_risk(grid: &Raster<f64>) -> FactorRisk {
    tiered(RiskFactor::UrbanAreas, &URBAN_RULE, grid)
}

/// NBR → {2, 5, 8}
pub fn burn_risk(grid: &Raster<f64>) -> FactorRisk {
    tiered(RiskFactor::BurnAreas, &BURN_RULE, grid)
}

/// Drainage index → {3, 6, 9}
pub fn drainage_risk(grid: &Raster<f64>) -> FactorRisk {
    tiered(RiskFactor::DrainageRisk, &DRAINAGE_RULE, grid)
}

/// Roof index → 2..=10 after min-max normalization over the finite cells.
///
/// Rounds half to even. A grid with no finite cells or no spread maps to a
/// constant 5, as do individual non-finite cells.
pub fn roof_risk(grid: &Raster<f64>) -> FactorRisk {
    let stats = grid.statistics();
    let raw_mean = stats.mean.unwrap_or(0.0);

    let risk = match (stats.min, stats.max) {
        (Some(min), Some(max)) if max > min => {
            let span = max - min;
            map_rows(grid, move |v| {
                if v.is_finite() {
                    ((v - min) / span * 8.0 + 2.0).round_ties_even()
                } else {
                    ROOF_NEUTRAL
                }
            })
        }
        _ => grid.like(ROOF_NEUTRAL),
    };

    FactorRisk {
        factor: RiskFactor::RoofRisk,
        risk,
        raw_mean,
        interpretation: interpret(RiskFactor::RoofRisk, raw_mean),
    }
}

/// Dispatch to the converter for `factor`
pub fn convert(factor: RiskFactor, grid: &Raster<f64>) -> FactorRisk {
    match factor {
        RiskFactor::VegetationHealth => vegetation_risk(grid),
        RiskFactor::WaterStress => water_risk(grid),
        RiskFactor::UrbanAreas => urban_risk(grid),
        RiskFactor::BurnAreas => burn_risk(grid),
        RiskFactor::RoofRisk => roof_risk(grid),
        RiskFactor::DrainageRisk => drainage_risk(grid),
    }
}
