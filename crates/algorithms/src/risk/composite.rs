//! Composite risk aggregation

use crate::align::align;
use satrisk_core::{Raster, RiskFactor};
use std::collections::BTreeMap;

/// Score used when nothing is known about an area.
pub const NEUTRAL_RISK: f64 = 5.0;

const MIN_RISK: f64 = 1.0;
const MAX_RISK: f64 = 10.0;

/// Mean risk score per processed factor, in canonical factor order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskFactorSet(BTreeMap<RiskFactor, f64>);

impl RiskFactorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, factor: RiskFactor, mean: f64) {
        self.0.insert(factor, mean);
    }

    pub fn get(&self, factor: RiskFactor) -> Option<f64> {
        self.0.get(&factor).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, f64)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }

    pub fn factors(&self) -> impl Iterator<Item = RiskFactor> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(RiskFactor, f64)> for RiskFactorSet {
    fn from_iter<I: IntoIterator<Item = (RiskFactor, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Combined risk of all present factors
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// Per-pixel mean risk, clamped to [1, 10]
    pub grid: Raster<f64>,
    pub factors: RiskFactorSet,
    /// Mean of the finite composite cells, NaN for an empty grid
    pub mean: f64,
    /// No factor contributed; `grid` is the neutral placeholder
    pub no_data: bool,
}

/// Average the risk layers pixel by pixel.
///
/// Layers whose shape differs from the first one are aligned to it. With no
/// layers, returns a constant neutral grid of `default_shape` flagged as
/// `no_data`.
pub fn composite(layers: &[(RiskFactor, Raster<f64>)], default_shape: (usize, usize)) -> Composite {
    let Some((_, first)) = layers.first() else {
        let (rows, cols) = default_shape;
        return Composite {
            grid: Raster::filled(rows, cols, NEUTRAL_RISK),
            factors: RiskFactorSet::new(),
            mean: NEUTRAL_RISK,
            no_data: true,
        };
    };

    let shape = first.shape();
    let mut sum = ndarray::Array2::<f64>::zeros(shape);
    let mut factors = RiskFactorSet::new();

    for (factor, layer) in layers {
        let aligned = align(layer, shape);
        sum += aligned.data();
        factors.insert(*factor, aligned.valid_mean().unwrap_or(f64::NAN));
    }

    let n = layers.len() as f64;
    let grid = Raster::from_array(sum.mapv(|s| (s / n).clamp(MIN_RISK, MAX_RISK)));
    let mean = grid.valid_mean().unwrap_or(f64::NAN);

    Composite {
        grid,
        factors,
        mean,
        no_data: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_layers_is_neutral() {
        let c = composite(&[], (256, 256));
        assert!(c.no_data);
        assert_eq!(c.grid.shape(), (256, 256));
        assert!(c.grid.data().iter().all(|&v| v == 5.0));
        assert!(c.factors.is_empty());
        assert_eq!(c.mean, 5.0);
    }

    #[test]
    fn pixelwise_mean() {
        let a = Raster::from_vec(vec![3.0, 7.0, 2.0, 10.0], 2, 2).unwrap();
        let b = Raster::from_vec(vec![5.0, 3.0, 2.0, 8.0], 2, 2).unwrap();
        let c = composite(
            &[(RiskFactor::VegetationHealth, a), (RiskFactor::UrbanAreas, b)],
            (256, 256),
        );
        assert!(!c.no_data);
        assert_eq!(c.grid.data().iter().copied().collect::<Vec<_>>(), vec![4.0, 5.0, 2.0, 9.0]);
        assert_eq!(c.factors.get(RiskFactor::VegetationHealth), Some(5.5));
        assert_eq!(c.factors.get(RiskFactor::UrbanAreas), Some(4.5));
        assert_eq!(c.mean, 5.0);
    }

    #[test]
    fn clamped_to_scale() {
        let low = Raster::filled(1, 2, 0.0);
        let c = composite(&[(RiskFactor::BurnAreas, low)], (1, 1));
        assert!(c.grid.data().iter().all(|&v| v == 1.0));

        let high = Raster::filled(1, 2, 42.0);
        let c = composite(&[(RiskFactor::BurnAreas, high)], (1, 1));
        assert!(c.grid.data().iter().all(|&v| v == 10.0));
    }

    #[test]
    fn order_independent() {
        let a = Raster::from_vec(vec![2.0, 4.0, 6.0, 8.0], 2, 2).unwrap();
        let b = Raster::from_vec(vec![9.0, 7.0, 5.0, 3.0], 2, 2).unwrap();
        let ab = composite(
            &[(RiskFactor::WaterStress, a.clone()), (RiskFactor::RoofRisk, b.clone())],
            (8, 8),
        );
        let ba = composite(&[(RiskFactor::RoofRisk, b), (RiskFactor::WaterStress, a)], (8, 8));
        assert_eq!(ab, ba);
    }

    #[test]
    fn mismatched_layers_are_aligned() {
        let a = Raster::filled(4, 4, 3.0);
        let b = Raster::filled(2, 2, 7.0);
        let c = composite(&[(RiskFactor::WaterStress, a), (RiskFactor::DrainageRisk, b)], (1, 1));
        assert_eq!(c.grid.shape(), (4, 4));
        assert!(c.grid.data().iter().all(|&v| (v - 5.0).abs() < 1e-12));
    }

    #[test]
    fn factor_set_iterates_in_canonical_order() {
        let set: RiskFactorSet = [
            (RiskFactor::DrainageRisk, 3.0),
            (RiskFactor::VegetationHealth, 7.0),
        ]
        .into_iter()
        .collect();
        let order: Vec<_> = set.factors().collect();
        assert_eq!(order, vec![RiskFactor::VegetationHealth, RiskFactor::DrainageRisk]);
    }
}
