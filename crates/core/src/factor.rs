//! Risk factors and their raw per-factor input

use crate::error::{Error, Result};
use crate::raster::{Raster, ValidityMask};
use ndarray::{s, Array3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six spectral risk factors.
///
/// Variant order is the canonical processing order: the first present factor
/// of a run fixes the reference grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// NDVI, (B08 - B04) / (B08 + B04)
    VegetationHealth,
    /// NDMI, (B08 - B11) / (B08 + B11)
    WaterStress,
    /// NDBI, (B11 - B08) / (B11 + B08)
    UrbanAreas,
    /// NBR, (B08 - B12) / (B08 + B12)
    BurnAreas,
    /// Bare roof exposure, unbounded multi-band index
    RoofRisk,
    /// Drainage obstruction proxy, NDVI/SWIR combination
    DrainageRisk,
}

impl RiskFactor {
    /// All factors in canonical order.
    pub const ALL: [RiskFactor; 6] = [
        Self::VegetationHealth,
        Self::WaterStress,
        Self::UrbanAreas,
        Self::BurnAreas,
        Self::RoofRisk,
        Self::DrainageRisk,
    ];

    /// Key used in risk summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VegetationHealth => "vegetation_health",
            Self::WaterStress => "water_stress",
            Self::UrbanAreas => "urban_areas",
            Self::BurnAreas => "burn_areas",
            Self::RoofRisk => "roof_risk",
            Self::DrainageRisk => "drainage_risk",
        }
    }

    /// Acquisition identifier: names both the processing script and the
    /// response output requested from the data provider.
    pub fn source_id(&self) -> &'static str {
        match self {
            Self::VegetationHealth => "veg_health",
            Self::WaterStress => "water_stress",
            Self::UrbanAreas => "urban_detection",
            Self::BurnAreas => "burn_detection",
            Self::RoofRisk => "roof_detection",
            Self::DrainageRisk => "drainage_detection",
        }
    }

    /// Short label of the underlying spectral index.
    pub fn index_label(&self) -> &'static str {
        match self {
            Self::VegetationHealth => "NDVI",
            Self::WaterStress => "NDMI",
            Self::UrbanAreas => "NDBI",
            Self::BurnAreas => "NBR",
            Self::RoofRisk => "BREI",
            Self::DrainageRisk => "DOPI",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::VegetationHealth => "NDVI (Vegetation Health)",
            Self::WaterStress => "NDMI (Water/Moisture Content)",
            Self::UrbanAreas => "NDBI (Built-up Areas)",
            Self::BurnAreas => "NBR (Burn Areas)",
            Self::RoofRisk => "Roof Material Analysis",
            Self::DrainageRisk => "Drainage Pattern Analysis",
        }
    }

    /// Sentinel-2 bands the index is computed from.
    pub fn bands(&self) -> &'static str {
        match self {
            Self::VegetationHealth => "B08/B04",
            Self::WaterStress => "B08/B11",
            Self::UrbanAreas => "B11/B08",
            Self::BurnAreas => "B08/B12",
            Self::RoofRisk => "B02,B04,B08,B11",
            Self::DrainageRisk => "B08,B04,B11",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RiskFactor {
    type Err = Error;

    /// Accepts either the summary name or the acquisition identifier.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == key || f.source_id() == key)
            .ok_or_else(|| Error::InvalidParameter {
                name: "factor",
                value: s.to_string(),
                reason: "unknown risk factor".into(),
            })
    }
}

/// Raw data for one factor, shaped `[height, width, channels]`.
///
/// Channel 0 holds the raw index value, channel 1 (when present) the
/// validity mask where `> 0` marks a usable pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorData {
    stack: Array3<f64>,
}

impl FactorData {
    /// Wrap a `[height, width, channels]` stack. At least one channel is required.
    pub fn new(stack: Array3<f64>) -> Result<Self> {
        let (rows, cols, channels) = stack.dim();
        if channels == 0 {
            return Err(Error::InvalidShape {
                expected: 3,
                actual: vec![rows, cols, channels],
            });
        }
        Ok(Self { stack })
    }

    /// Build a two-channel stack from values and an optional mask.
    pub fn from_parts(values: &Raster<f64>, mask: Option<&ValidityMask>) -> Result<Self> {
        let (rows, cols) = values.shape();
        let channels = if mask.is_some() { 2 } else { 1 };
        let mut stack = Array3::<f64>::zeros((rows, cols, channels));
        stack.slice_mut(s![.., .., 0]).assign(values.data());

        if let Some(mask) = mask {
            let (mr, mc) = mask.shape();
            if (mr, mc) != (rows, cols) {
                return Err(Error::SizeMismatch {
                    er: rows,
                    ec: cols,
                    ar: mr,
                    ac: mc,
                });
            }
            for ((r, c), v) in stack.slice_mut(s![.., .., 1]).indexed_iter_mut() {
                *v = if mask.is_valid(r, c) { 1.0 } else { 0.0 };
            }
        }
        Self::new(stack)
    }

    /// Grid shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        let (rows, cols, _) = self.stack.dim();
        (rows, cols)
    }

    pub fn channels(&self) -> usize {
        self.stack.dim().2
    }

    pub fn stack(&self) -> &Array3<f64> {
        &self.stack
    }

    /// Channel 0: raw index values
    pub fn values(&self) -> Raster<f64> {
        Raster::from_array(self.stack.slice(s![.., .., 0]).to_owned())
    }

    /// Channel 1 as a validity mask, if present
    pub fn mask(&self) -> Option<ValidityMask> {
        if self.channels() < 2 {
            return None;
        }
        let channel = Raster::from_array(self.stack.slice(s![.., .., 1]).to_owned());
        Some(ValidityMask::from_channel(&channel))
    }

    /// Raw values with masked-out pixels replaced by NaN
    pub fn masked_values(&self) -> Raster<f64> {
        let values = self.values();
        match self.mask() {
            // Shapes come from the same stack, so apply cannot fail.
            Some(mask) => mask.apply(&values).unwrap_or(values),
            None => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for f in RiskFactor::ALL {
            assert_eq!(f.name().parse::<RiskFactor>().unwrap(), f);
            assert_eq!(f.source_id().parse::<RiskFactor>().unwrap(), f);
        }
        assert!("cloud_cover".parse::<RiskFactor>().is_err());
    }

    #[test]
    fn canonical_order() {
        let mut shuffled = vec![RiskFactor::DrainageRisk, RiskFactor::VegetationHealth, RiskFactor::RoofRisk];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![RiskFactor::VegetationHealth, RiskFactor::RoofRisk, RiskFactor::DrainageRisk]
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&RiskFactor::UrbanAreas).unwrap();
        assert_eq!(json, "\"urban_areas\"");
    }

    #[test]
    fn factor_data_channels() {
        let values = Raster::from_vec(vec![0.1, 0.2, 0.3, 0.4], 2, 2).unwrap();
        let mask = ValidityMask::from_channel(&Raster::from_vec(vec![1.0, 0.0, 1.0, 1.0], 2, 2).unwrap());
        let data = FactorData::from_parts(&values, Some(&mask)).unwrap();

        assert_eq!(data.shape(), (2, 2));
        assert_eq!(data.channels(), 2);
        assert_eq!(data.values(), values);
        assert_eq!(data.mask().unwrap().valid_count(), 3);
        assert!(data.masked_values().get(0, 1).unwrap().is_nan());
    }

    #[test]
    fn single_channel_has_no_mask() {
        let data = FactorData::new(Array3::from_elem((3, 4, 1), 0.5)).unwrap();
        assert!(data.mask().is_none());
        assert_eq!(data.masked_values().get(2, 3).unwrap(), 0.5);
    }

    #[test]
    fn zero_channels_rejected() {
        assert!(FactorData::new(Array3::zeros((2, 2, 0))).is_err());
    }
}
