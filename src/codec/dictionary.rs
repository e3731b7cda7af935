//! Attribute dictionary.
//!
//! Static table mapping `(cluster, attribute id)` to a semantic field name, the
//! attribute's wire type and a pair of pure transforms. Entries are plain data;
//! the decode and encode pipelines do a single lookup and apply the transform.

use super::value::{RawValue, SemanticValue};
use crate::error::{AdapterError, Result};
use crate::zcl::{AttributeId, Cluster, DataType};
use std::collections::HashMap;

/// Boolean-style enumeration shared by every binary field: index 0 is `OFF`,
/// index 1 is `ON`.
pub const BOOLEAN_TOKENS: [&str; 2] = ["OFF", "ON"];

/// Look up a token of the boolean convention, returning its raw index.
pub fn boolean_token(token: &str) -> Option<RawValue> {
    BOOLEAN_TOKENS
        .iter()
        .position(|t| *t == token)
        .map(|idx| idx as RawValue)
}

/// Unique attribute address within a device family.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AttributeKey {
    pub cluster: Cluster,
    pub attribute: AttributeId,
}

impl AttributeKey {
    pub const fn new(cluster: Cluster, attribute: AttributeId) -> Self {
        Self { cluster, attribute }
    }
}

/// Value transform between a raw attribute and its semantic value.
///
/// `decode` and `encode` are inverse on each variant's domain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transform {
    /// Raw integer passed through.
    Identity,
    /// Boolean convention, see [`BOOLEAN_TOKENS`].
    OnOff,
    /// Fixed-point reading: `raw / divisor`.
    Divide(u32),
    /// Scaled reading: `raw * factor`.
    Multiply(u32),
    /// Alarm flag: set when any bit of the mask is set.
    AnyBit(u32),
}

impl Transform {
    pub fn decode(self, raw: RawValue) -> std::result::Result<SemanticValue, String> {
        match self {
            Transform::Identity => Ok(SemanticValue::Int(raw)),
            Transform::OnOff => usize::try_from(raw)
                .ok()
                .and_then(|idx| BOOLEAN_TOKENS.get(idx))
                .map(|token| SemanticValue::text(*token))
                .ok_or_else(|| format!("enum index {} out of range", raw)),
            Transform::Divide(divisor) => Ok(SemanticValue::Float(raw as f64 / divisor as f64)),
            Transform::Multiply(factor) => raw
                .checked_mul(factor as i64)
                .map(SemanticValue::Int)
                .ok_or_else(|| "scaled value overflows".to_string()),
            Transform::AnyBit(mask) => Ok(SemanticValue::Bool(raw & i64::from(mask) != 0)),
        }
    }

    pub fn encode(self, value: &SemanticValue) -> std::result::Result<RawValue, String> {
        match self {
            Transform::Identity => integral(value),
            Transform::OnOff => match value {
                SemanticValue::Text(token) => {
                    boolean_token(token).ok_or_else(|| format!("expected ON or OFF, got {}", token))
                }
                SemanticValue::Bool(b) => Ok(*b as RawValue),
                other => Err(format!("expected ON or OFF, got {}", other)),
            },
            Transform::Divide(divisor) => {
                let v = numeric(value)?;
                Ok((v * divisor as f64).round() as RawValue)
            }
            Transform::Multiply(factor) => {
                let v = numeric(value)?;
                Ok((v / factor as f64).round() as RawValue)
            }
            Transform::AnyBit(mask) => match value {
                SemanticValue::Bool(true) => Ok(RawValue::from(mask)),
                SemanticValue::Bool(false) => Ok(0),
                other => Err(format!("expected a boolean, got {}", other)),
            },
        }
    }
}

fn numeric(value: &SemanticValue) -> std::result::Result<f64, String> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("expected a number, got {}", value))
}

fn integral(value: &SemanticValue) -> std::result::Result<RawValue, String> {
    let v = numeric(value)?;
    if v.fract() != 0.0 {
        return Err(format!("expected an integer, got {}", v));
    }
    Ok(v as RawValue)
}

/// One row of the dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeEntry {
    pub key: AttributeKey,
    pub field: &'static str,
    pub data_type: DataType,
    pub transform: Transform,
    /// Raw values the attribute accepts, when narrower than the wire type.
    pub valid: Option<(RawValue, RawValue)>,
}

impl AttributeEntry {
    pub const fn new(
        cluster: Cluster,
        attribute: AttributeId,
        field: &'static str,
        data_type: DataType,
        transform: Transform,
    ) -> Self {
        Self {
            key: AttributeKey::new(cluster, attribute),
            field,
            data_type,
            transform,
            valid: None,
        }
    }

    /// Restrict the accepted raw values to `min..=max`, e.g. to drop the
    /// "invalid" sentinel a measurement reports before its first reading.
    pub const fn with_valid(mut self, min: RawValue, max: RawValue) -> Self {
        self.valid = Some((min, max));
        self
    }

    fn check_raw(&self, raw: RawValue) -> std::result::Result<(), String> {
        if !self.data_type.contains(raw) {
            return Err(format!("{} outside {} range", raw, self.data_type));
        }
        if let Some((min, max)) = self.valid
            && !(min..=max).contains(&raw)
        {
            return Err(format!("{} outside valid range {}..={}", raw, min, max));
        }
        Ok(())
    }

    /// Raw value to semantic value. Raw values outside the wire type's range
    /// or the entry's valid range are rejected before the transform is applied.
    pub fn decode(&self, raw: RawValue) -> std::result::Result<SemanticValue, String> {
        self.check_raw(raw)?;
        self.transform.decode(raw)
    }

    /// Semantic value to raw value, checked the same way as `decode`.
    pub fn encode(&self, value: &SemanticValue) -> std::result::Result<RawValue, String> {
        let raw = self.transform.encode(value)?;
        self.check_raw(raw)?;
        Ok(raw)
    }
}

/// Collision-free lookup table, indexed by attribute key and by field name.
#[derive(Debug, Clone)]
pub struct AttributeDictionary {
    entries: Vec<AttributeEntry>,
    by_key: HashMap<AttributeKey, usize>,
    by_field: HashMap<&'static str, usize>,
}

impl AttributeDictionary {
    /// Build the dictionary, rejecting duplicate keys and duplicate fields.
    pub fn new(model: &str, entries: &[AttributeEntry]) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(entries.len());
        let mut by_field = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            if by_key.insert(entry.key, idx).is_some() {
                return Err(AdapterError::DictionaryInconsistency {
                    model: model.to_string(),
                    reason: format!(
                        "attribute {} 0x{:04X} mapped twice",
                        entry.key.cluster, entry.key.attribute
                    ),
                });
            }
            if by_field.insert(entry.field, idx).is_some() {
                return Err(AdapterError::DictionaryInconsistency {
                    model: model.to_string(),
                    reason: format!("field {} mapped twice", entry.field),
                });
            }
        }

        Ok(Self {
            entries: entries.to_vec(),
            by_key,
            by_field,
        })
    }

    pub fn lookup_by_key(&self, cluster: Cluster, attribute: AttributeId) -> Option<&AttributeEntry> {
        self.by_key
            .get(&AttributeKey::new(cluster, attribute))
            .map(|&idx| &self.entries[idx])
    }

    pub fn lookup_by_field(&self, field: &str) -> Option<&AttributeEntry> {
        self.by_field.get(field).map(|&idx| &self.entries[idx])
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
