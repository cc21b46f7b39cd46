//! Plain-language reading of a factor's mean raw index
//!
//! The interpretation breakpoints are not the risk breakpoints: they come
//! from the underwriting guidance text and are kept as published.

use satrisk_core::RiskFactor;

pub const ROOF_INTERPRETATION: &str = "Custom roof material analysis for hail/storm vulnerability";

/// `(threshold, text)` pairs in descending order plus the fallback text.
type Reading = (&'static [(f64, &'static str)], &'static str);

const VEGETATION: Reading = (
    &[
        (0.6, "Dense vegetation - lower fire risk, potential storm damage risk"),
        (0.3, "Moderate vegetation - balanced risk profile"),
        (0.1, "Sparse vegetation - higher fire risk"),
    ],
    "Very sparse/no vegetation - high fire risk, erosion risk",
);

const WATER: Reading = (
    &[
        (0.3, "High moisture content - lower fire risk"),
        (0.0, "Moderate moisture content - medium fire risk"),
        (-0.2, "Low moisture content - elevated fire risk"),
    ],
    "Very low moisture - high fire risk",
);

const URBAN: Reading = (
    &[
        (0.2, "Dense built-up area - high property density"),
        (0.0, "Moderate development - medium property density"),
        (-0.2, "Light development - low property density"),
    ],
    "Natural area - minimal built infrastructure",
);

const BURN: Reading = (
    &[
        (0.4, "Healthy vegetation - low fire risk"),
        (0.2, "Moderate vegetation health - medium fire risk"),
        (0.0, "Stressed vegetation - elevated fire risk"),
    ],
    "Severely stressed/burned vegetation - high fire risk",
);

const DRAINAGE: Reading = (
    &[
        (0.2, "Good drainage - vegetation thriving with appropriate moisture"),
        (0.0, "Moderate drainage - some areas may have issues"),
        (-0.2, "Poor drainage - vegetation stressed despite moisture"),
    ],
    "Very poor drainage - high flood/waterlogging risk",
);

/// Interpretation text for a factor given the mean of its finite raw cells
pub fn interpret(factor: RiskFactor, mean: f64) -> &'static str {
    let (tiers, otherwise) = match factor {
        RiskFactor::VegetationHealth => VEGETATION,
        RiskFactor::WaterStress => WATER,
        RiskFactor::UrbanAreas => URBAN,
        RiskFactor::BurnAreas => BURN,
        RiskFactor::DrainageRisk => DRAINAGE,
        RiskFactor::RoofRisk => return ROOF_INTERPRETATION,
    };

    tiers
        .iter()
        .find(|(threshold, _)| mean > *threshold)
        .map(|(_, text)| *text)
        .unwrap_or(otherwise)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegetation_readings() {
        assert!(interpret(RiskFactor::VegetationHealth, 0.7).starts_with("Dense vegetation"));
        assert!(interpret(RiskFactor::VegetationHealth, 0.5).starts_with("Moderate vegetation"));
        assert!(interpret(RiskFactor::VegetationHealth, 0.2).starts_with("Sparse vegetation"));
        assert!(interpret(RiskFactor::VegetationHealth, 0.1).starts_with("Very sparse"));
    }

    #[test]
    fn breakpoints_are_strict() {
        assert_eq!(
            interpret(RiskFactor::WaterStress, 0.0),
            "Low moisture content - elevated fire risk"
        );
        assert_eq!(
            interpret(RiskFactor::BurnAreas, 0.0),
            "Severely stressed/burned vegetation - high fire risk"
        );
    }

    #[test]
    fn thresholds_differ_from_risk_tiers() {
        // 0.25 is risk tier 5 for vegetation but reads as "Sparse"
        assert_eq!(
            interpret(RiskFactor::VegetationHealth, 0.25),
            "Sparse vegetation - higher fire risk"
        );
    }

    #[test]
    fn roof_is_constant() {
        for mean in [-5.0, 0.0, 100.0, f64::NAN] {
            assert_eq!(interpret(RiskFactor::RoofRisk, mean), ROOF_INTERPRETATION);
        }
    }

    #[test]
    fn every_factor_has_text() {
        for f in RiskFactor::ALL {
            assert!(!interpret(f, 0.0).is_empty());
            assert!(!interpret(f, f64::NAN).is_empty());
        }
    }
}
