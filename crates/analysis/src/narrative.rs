//! Plain-language summaries of risk scores

use satrisk_algorithms::risk::RiskFactorSet;
use satrisk_core::RiskFactor;
use std::fmt::Write;

/// Changes smaller than this many points read as stable.
const STABLE_CHANGE: f64 = 0.5;

/// Factor scores above this trigger a factor-specific recommendation.
const FACTOR_ALERT: f64 = 6.0;

/// Verbal level of a 1-10 risk score.
pub fn risk_level_text(score: f64) -> &'static str {
    if score < 3.0 {
        "Low Risk"
    } else if score < 6.0 {
        "Moderate Risk"
    } else if score < 8.0 {
        "High Risk"
    } else {
        "Critical Risk"
    }
}

/// Summary of a series of per-period composite scores, oldest first.
pub fn trend_summary(composites: &[f64]) -> String {
    if composites.len() < 2 {
        return "Insufficient data for trend analysis.".to_string();
    }
    let first = composites[0];
    let last = composites[composites.len() - 1];

    let change = last - first;
    let trend = if change.abs() < STABLE_CHANGE {
        "Risk levels have remained relatively stable over the analysis period.".to_string()
    } else {
        let direction = if change > 0.0 { "increased" } else { "decreased" };
        format!(
            "Risk levels have {direction} by {:.1} points ({:.1}%) over the analysis period.",
            change.abs(),
            change.abs() / first * 100.0
        )
    };

    let max = composites.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = composites.iter().copied().fold(f64::INFINITY, f64::min);
    let avg = composites.iter().sum::<f64>() / composites.len() as f64;

    format!(
        "{trend} The analysis period shows an average risk of {avg:.1}, with values ranging from {min:.1} to {max:.1}."
    )
}

fn factor_recommendation(factor: RiskFactor) -> Option<&'static str> {
    match factor {
        RiskFactor::VegetationHealth => {
            Some("Poor vegetation health detected - consider fire prevention measures.")
        }
        RiskFactor::WaterStress => {
            Some("High water stress identified - monitor drought conditions and water supply.")
        }
        RiskFactor::BurnAreas => {
            Some("Fire risk detected - review fire safety protocols and insurance coverage.")
        }
        RiskFactor::RoofRisk => {
            Some("Roof vulnerability identified - consider structural assessments and improvements.")
        }
        RiskFactor::DrainageRisk => {
            Some("Drainage issues detected - assess flood risk and drainage infrastructure.")
        }
        RiskFactor::UrbanAreas => None,
    }
}

/// Risk management recommendations for an overall score and per-factor scores.
pub fn recommendations(total_risk: f64, factors: &RiskFactorSet) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if total_risk > 7.0 {
        out.push("Immediate attention required due to high overall risk levels.".into());
        out.push("Consider comprehensive risk mitigation strategies.".into());
    } else if total_risk > 5.0 {
        out.push("Moderate risk levels detected - implement preventive measures.".into());
    } else {
        out.push("Low risk levels detected - maintain current monitoring practices.".into());
    }

    for (factor, score) in factors.iter() {
        if score > FACTOR_ALERT {
            if let Some(text) = factor_recommendation(factor) {
                out.push(text.into());
            }
        }
    }

    out.push("Regular monitoring recommended using satellite-based risk assessment.".into());
    out.push("Consider updating insurance coverage based on identified risk factors.".into());
    out
}

/// Display label and the noun used in its level sentence.
fn factor_wording(factor: RiskFactor) -> (&'static str, &'static str) {
    match factor {
        RiskFactor::VegetationHealth => ("Vegetation Health", "vegetation health"),
        RiskFactor::WaterStress => ("Water Stress", "water stress"),
        RiskFactor::UrbanAreas => ("Urban Development", "urban development"),
        RiskFactor::BurnAreas => ("Fire Risk", "fire risk"),
        RiskFactor::RoofRisk => ("Roof Vulnerability", "roof vulnerability"),
        RiskFactor::DrainageRisk => ("Drainage Issues", "drainage issues"),
    }
}

/// Multi-section interpretation used when no richer narrative is available.
pub fn basic_interpretation(total_risk: f64, factors: &RiskFactorSet) -> String {
    let mut text = String::new();
    let _ = write!(
        text,
        "1. Overall Risk Assessment\nThe area shows an overall risk score of {total_risk:.1}/10. \
         This indicates a {} level of risk.\n\n2. Key Risk Factors\n",
        risk_level_text(total_risk).to_lowercase()
    );

    for (factor, score) in factors.iter() {
        let (label, noun) = factor_wording(factor);
        let _ = writeln!(
            text,
            "- {label} ({score:.1}/10): {} level of {noun}",
            risk_level_text(score)
        );
    }

    text.push_str(
        "\n3. Recommendations\n\
         Based on the risk assessment, we recommend:\n\
         - Regular monitoring of the identified risk factors\n\
         - Implementation of appropriate risk mitigation strategies\n\
         - Regular updates to insurance coverage based on risk levels\n\
         - Consultation with risk management experts for detailed planning\n\n\
         4. Risk Patterns\n\
         The analysis shows a combination of different risk factors that should be \
         monitored together for comprehensive risk management.",
    );
    text
}
