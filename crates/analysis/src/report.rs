//! Analysis results and their JSON-safe form

use crate::narrative::{basic_interpretation, recommendations, trend_summary};
use satrisk_acquire::{DateRange, DegradedFactor};
use satrisk_algorithms::risk::{IndexSummary, RiskAssessment, RiskFactorSet, NEUTRAL_RISK};
use satrisk_colormap::ColorRaster;
use satrisk_core::json::{ToValue, Value};
use satrisk_core::{Bounds, ImageSize, RiskFactor};
use std::collections::BTreeMap;

/// Where and at what scale an analysis ran
#[derive(Debug, Clone, PartialEq)]
pub struct AreaInfo {
    pub bounds: Bounds,
    pub area_km2: f64,
    /// Resolution picked from the tier table
    pub resolution_m: u32,
    /// Requested image size, possibly coarsened
    pub image: ImageSize,
    pub period: DateRange,
}

/// Outcome for one acquisition period
#[derive(Debug, Clone)]
pub struct PeriodAssessment {
    pub period: DateRange,
    pub assessment: RiskAssessment,
    /// Composite risk rendered as the green-to-red gradient
    pub risk_image: ColorRaster,
    /// Raw index of every factor rendered with its configured scheme
    pub factor_images: BTreeMap<RiskFactor, ColorRaster>,
    pub degraded: Vec<DegradedFactor>,
}

impl PeriodAssessment {
    /// Mean composite score, neutral when undefined
    pub fn composite_risk(&self) -> f64 {
        let mean = self.assessment.composite.mean;
        if mean.is_finite() {
            mean
        } else {
            NEUTRAL_RISK
        }
    }

    pub fn risk_values(&self) -> &RiskFactorSet {
        &self.assessment.composite.factors
    }

    pub fn using_fallback(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Status line naming the factors that used synthetic data
    pub fn message(&self) -> String {
        if self.degraded.is_empty() {
            return "Analysis complete using real satellite data.".to_string();
        }
        let names: Vec<&str> = self.degraded.iter().map(|d| d.factor.description()).collect();
        format!(
            "Analysis complete. Note: {} used placeholder data due to data provider issues.",
            names.join(", ")
        )
    }
}

/// Result of a single-period analysis
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub area: AreaInfo,
    pub result: PeriodAssessment,
}

impl AnalysisReport {
    pub fn composite_risk(&self) -> f64 {
        self.result.composite_risk()
    }

    pub fn recommendations(&self) -> Vec<String> {
        recommendations(self.composite_risk(), self.result.risk_values())
    }

    pub fn interpretation(&self) -> String {
        basic_interpretation(self.composite_risk(), self.result.risk_values())
    }
}

/// Result of a trend analysis, periods oldest first
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub area: AreaInfo,
    pub interval_months: u32,
    pub periods: Vec<PeriodAssessment>,
    /// Periods that produced no result, with the reason
    pub skipped: Vec<(DateRange, String)>,
}

impl TrendReport {
    pub fn composites(&self) -> Vec<f64> {
        self.periods.iter().map(PeriodAssessment::composite_risk).collect()
    }

    pub fn summary(&self) -> String {
        trend_summary(&self.composites())
    }
}

fn index_value(summary: &IndexSummary) -> Value {
    Value::map([
        ("index", Value::from(summary.index)),
        ("raw_mean", Value::from(summary.raw_mean)),
        ("interpretation", Value::from(summary.interpretation.as_str())),
    ])
}

fn image_value(image: &ColorRaster) -> Value {
    let (rows, cols) = image.shape();
    Value::map([
        ("scheme", Value::from(image.scheme())),
        ("width", Value::from(cols)),
        ("height", Value::from(rows)),
    ])
}

fn factor_set_value(set: &RiskFactorSet) -> Value {
    Value::map(set.iter().map(|(f, v)| (f.name(), Value::from(v))))
}

impl ToValue for AreaInfo {
    fn to_value(&self) -> Value {
        let b = &self.bounds;
        Value::map([
            (
                "coordinates",
                Value::map([
                    ("min_lon", Value::from(b.min_lon)),
                    ("min_lat", Value::from(b.min_lat)),
                    ("max_lon", Value::from(b.max_lon)),
                    ("max_lat", Value::from(b.max_lat)),
                ]),
            ),
            ("area_km2", Value::from((self.area_km2 * 10.0).round() / 10.0)),
            ("resolution_m", Value::from(self.resolution_m as i64)),
            ("width_px", Value::from(self.image.width)),
            ("height_px", Value::from(self.image.height)),
            ("analysis_date", Value::from(self.period.end.to_string())),
            ("data_period", Value::from(self.period.to_string())),
        ])
    }
}

impl ToValue for PeriodAssessment {
    fn to_value(&self) -> Value {
        let composite = &self.assessment.composite;

        let mut index_values: BTreeMap<String, Value> = self
            .assessment
            .summaries
            .iter()
            .map(|(f, s)| (f.name().to_string(), index_value(s)))
            .collect();
        if composite.no_data {
            index_values.insert("message".into(), Value::from("No satellite data available"));
        }

        let factor_images = Value::map(
            self.factor_images
                .iter()
                .map(|(f, img)| (f.name(), image_value(img))),
        );
        let failed: Vec<Value> = self
            .degraded
            .iter()
            .map(|d| Value::from(d.factor.description()))
            .collect();

        Value::map([
            ("analysis_date", Value::from(self.period.end.to_string())),
            ("data_period", Value::from(self.period.to_string())),
            ("message", Value::from(self.message())),
            ("has_warnings", Value::from(self.using_fallback())),
            ("failed_factors", Value::Seq(failed)),
            ("using_fallback", Value::from(self.using_fallback())),
            ("composite_risk", Value::from(self.composite_risk())),
            ("index_values", Value::Map(index_values)),
            ("risk_values", factor_set_value(&composite.factors)),
            ("composite_grid", Value::from(&composite.grid)),
            ("risk_image", image_value(&self.risk_image)),
            ("factor_images", factor_images),
        ])
    }
}

impl ToValue for AnalysisReport {
    fn to_value(&self) -> Value {
        let mut value = match self.result.to_value() {
            Value::Map(m) => m,
            _ => BTreeMap::new(),
        };
        value.insert("status".into(), Value::from("success"));
        value.insert("area_info".into(), self.area.to_value());
        value.insert("recommendations".into(), Value::from(self.recommendations()));
        value.insert("interpretation".into(), Value::from(self.interpretation()));
        Value::Map(value)
    }
}

impl ToValue for TrendReport {
    fn to_value(&self) -> Value {
        let periods: Vec<Value> = self
            .periods
            .iter()
            .map(|p| match p.to_value() {
                // per-period grids would dominate the document
                Value::Map(mut m) => {
                    m.remove("composite_grid");
                    Value::Map(m)
                }
                other => other,
            })
            .collect();
        let skipped: Vec<Value> = self
            .skipped
            .iter()
            .map(|(period, reason)| {
                Value::map([
                    ("data_period", Value::from(period.to_string())),
                    ("reason", Value::from(reason.as_str())),
                ])
            })
            .collect();

        Value::map([
            ("status", Value::from("success")),
            ("analysis_type", Value::from("trend")),
            ("trend_data", Value::Seq(periods)),
            ("skipped_periods", Value::Seq(skipped)),
            (
                "summary",
                Value::map([
                    ("total_periods", Value::from(self.periods.len())),
                    ("date_range", Value::from(self.area.period.to_string())),
                    ("interval_months", Value::from(self.interval_months as i64)),
                    ("area_km2", Value::from((self.area.area_km2 * 10.0).round() / 10.0)),
                    ("text", Value::from(self.summary())),
                ]),
            ),
            ("area_info", self.area.to_value()),
        ])
    }
}
