//! JSON-safe result trees.
//!
//! Analysis results carry NaN and infinities (masked pixels, empty means)
//! which JSON cannot represent. Results are first built as a [`Value`] tree,
//! then passed through [`sanitize`], after which conversion to
//! `serde_json::Value` is lossless.

use crate::raster::Raster;
use ndarray::{ArrayD, Axis};
use std::collections::BTreeMap;

/// Replacement for NaN / infinite numbers.
pub const NON_FINITE_FALLBACK: f64 = 0.0;

/// A nested result structure: mappings, sequences, scalars and numeric arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Numeric array of any rank
    Grid(ArrayD<f64>),
}

/// Conversion into a [`Value`] tree.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Recursively make `value` JSON-safe.
///
/// Non-finite floats become `0.0`, numeric arrays become nested sequences,
/// everything else passes through. Sanitizing twice yields the same tree.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Float(f) => Value::Float(finite_or_fallback(*f)),
        Value::Seq(items) => Value::Seq(items.iter().map(sanitize).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
        Value::Grid(array) => grid_to_seq(array),
        other => other.clone(),
    }
}

fn finite_or_fallback(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        NON_FINITE_FALLBACK
    }
}

fn grid_to_seq(array: &ArrayD<f64>) -> Value {
    if array.ndim() == 0 {
        return array
            .iter()
            .next()
            .map(|v| Value::Float(finite_or_fallback(*v)))
            .unwrap_or(Value::Null);
    }
    if array.ndim() == 1 {
        return Value::Seq(
            array
                .iter()
                .map(|v| Value::Float(finite_or_fallback(*v)))
                .collect(),
        );
    }
    Value::Seq(
        array
            .axis_iter(Axis(0))
            .map(|sub| grid_to_seq(&sub.to_owned()))
            .collect(),
    )
}

impl Value {
    /// Build a map from `(key, value)` pairs.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether any non-finite float is reachable from this node.
    pub fn has_non_finite(&self) -> bool {
        match self {
            Value::Float(f) => !f.is_finite(),
            Value::Seq(items) => items.iter().any(Value::has_non_finite),
            Value::Map(entries) => entries.values().any(Value::has_non_finite),
            Value::Grid(array) => array.iter().any(|v| !v.is_finite()),
            _ => false,
        }
    }

    /// Convert to a `serde_json::Value`, sanitizing on the way.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match sanitize(self) {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(b),
            Value::Int(i) => J::from(i),
            // finite after sanitize, so from_f64 always succeeds
            Value::Float(f) => serde_json::Number::from_f64(f).map(J::Number).unwrap_or(J::Null),
            Value::Str(s) => J::String(s),
            Value::Seq(items) => J::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => J::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Grid(_) => J::Null,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&Raster<f64>> for Value {
    fn from(r: &Raster<f64>) -> Self {
        Value::Grid(r.data().clone().into_dyn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Value {
        Value::map([
            ("a", Value::Float(f64::NAN)),
            ("b", Value::from(vec![1.0, f64::INFINITY])),
        ])
    }

    #[test]
    fn replaces_non_finite() {
        let clean = sanitize(&sample());
        let expected = Value::map([
            ("a", Value::Float(0.0)),
            ("b", Value::from(vec![1.0, 0.0])),
        ]);
        assert_eq!(clean, expected);
        assert!(!clean.has_non_finite());
    }

    #[test]
    fn idempotent() {
        let nested = Value::map([
            ("grid", Value::Grid(array![[1.0, f64::NAN], [f64::NEG_INFINITY, 4.0]].into_dyn())),
            ("deep", Value::from(vec![Value::from(vec![Value::Float(f64::NAN)])])),
            ("label", Value::from("ok")),
            ("count", Value::Int(3)),
        ]);
        let once = sanitize(&nested);
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn grid_becomes_nested_sequence() {
        let g = Value::Grid(array![[1.0, 2.0], [3.0, f64::NAN]].into_dyn());
        let expected = Value::from(vec![
            Value::from(vec![1.0, 2.0]),
            Value::from(vec![3.0, 0.0]),
        ]);
        assert_eq!(sanitize(&g), expected);
    }

    #[test]
    fn other_values_pass_through() {
        for v in [Value::Null, Value::Bool(true), Value::Int(-7), Value::from("x")] {
            assert_eq!(sanitize(&v), v);
        }
    }

    #[test]
    fn to_json_matches_expected_document() {
        let json = sample().to_json();
        assert_eq!(json, serde_json::json!({ "a": 0.0, "b": [1.0, 0.0] }));
    }

    #[test]
    fn raster_converts_to_rows() {
        let r = Raster::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let json = Value::from(&r).to_json();
        assert_eq!(json, serde_json::json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
    }

    #[test]
    fn deep_nesting_terminates() {
        let mut v = Value::Float(f64::NAN);
        for _ in 0..500 {
            v = Value::Seq(vec![v]);
        }
        assert!(!sanitize(&v).has_non_finite());
    }
}
