//! Raw and semantic attribute values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Integral attribute value as parsed by the transport.
///
/// Every wire type handled here (boolean, bitmaps, enums, signed and unsigned
/// integers up to 32 bits) fits losslessly in an `i64`.
pub type RawValue = i64;

/// Normalized value exposed to the application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SemanticValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SemanticValue {
    pub fn text(value: impl Into<String>) -> Self {
        SemanticValue::Text(value.into())
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SemanticValue::Int(i) => Some(*i as f64),
            SemanticValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SemanticValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticValue::Bool(b) => write!(f, "{}", b),
            SemanticValue::Int(i) => write!(f, "{}", i),
            SemanticValue::Float(v) => write!(f, "{}", v),
            SemanticValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SemanticValue {
    fn from(value: bool) -> Self {
        SemanticValue::Bool(value)
    }
}

impl From<i64> for SemanticValue {
    fn from(value: i64) -> Self {
        SemanticValue::Int(value)
    }
}

impl From<f64> for SemanticValue {
    fn from(value: f64) -> Self {
        SemanticValue::Float(value)
    }
}

impl From<&str> for SemanticValue {
    fn from(value: &str) -> Self {
        SemanticValue::Text(value.to_string())
    }
}

/// Partial state update keyed by semantic field name.
///
/// Fields absent from an update are left untouched by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticState(BTreeMap<String, SemanticValue>);

impl SemanticState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: SemanticValue) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&SemanticValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SemanticValue)> {
        self.0.iter()
    }

    /// Apply `update` on top of this state.
    pub fn merge(&mut self, update: SemanticState) {
        self.0.extend(update.0);
    }
}

impl<K: Into<String>> FromIterator<(K, SemanticValue)> for SemanticState {
    fn from_iter<I: IntoIterator<Item = (K, SemanticValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_flat() {
        let state: SemanticState = [
            ("high_temp", SemanticValue::Int(25)),
            ("enable_temp", SemanticValue::text("ON")),
            ("temperature", SemanticValue::Float(21.5)),
            ("battery_low", SemanticValue::Bool(false)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "battery_low": false,
                "enable_temp": "ON",
                "high_temp": 25,
                "temperature": 21.5,
            })
        );
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut state: SemanticState = [("high_temp", SemanticValue::Int(25))].into_iter().collect();
        let update: SemanticState = [("low_temp", SemanticValue::Int(5))].into_iter().collect();
        state.merge(update);

        assert_eq!(state.len(), 2);
        assert_eq!(state.get("high_temp"), Some(&SemanticValue::Int(25)));
        assert_eq!(state.get("low_temp"), Some(&SemanticValue::Int(5)));
    }
}
