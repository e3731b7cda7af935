//! Encode pipeline: application set requests to attribute writes.

use super::dictionary::{AttributeDictionary, boolean_token};
use super::value::{RawValue, SemanticState, SemanticValue};
use crate::error::EncodeError;
use crate::schema::{BinaryValue, CapabilitySchema, FieldInfo, FieldKind};
use crate::zcl::{AttributeId, Cluster, DataType};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value as received from the application bus: either a string token or a
/// JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for RequestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestValue::Number(n) => write!(f, "{}", n),
            RequestValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RequestValue {
    fn from(value: &str) -> Self {
        RequestValue::Text(value.to_string())
    }
}

impl From<f64> for RequestValue {
    fn from(value: f64) -> Self {
        RequestValue::Number(value)
    }
}

/// Request to change one semantic field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRequest {
    pub field: String,
    pub value: RequestValue,
}

impl SetRequest {
    pub fn new(field: impl Into<String>, value: impl Into<RequestValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A single attribute write for the transport, tagged with the field and the
/// semantic value that was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteInstruction {
    pub cluster: Cluster,
    pub attribute: AttributeId,
    pub data_type: DataType,
    pub raw: RawValue,
    pub field: &'static str,
    pub requested: SemanticValue,
}

impl WriteInstruction {
    /// State the caller may publish before the device confirms the write.
    pub fn optimistic_state(&self) -> SemanticState {
        [(self.field, self.requested.clone())].into_iter().collect()
    }

    /// Attribute payload in the host bridge's write format:
    /// `{"<attribute id>": {"value": raw, "type": tag}}`.
    pub fn payload(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        payload.insert(
            self.attribute.to_string(),
            serde_json::json!({ "value": self.raw, "type": self.data_type.tag() }),
        );
        serde_json::Value::Object(payload)
    }
}

/// Number or boolean-convention index parsed from a request value.
enum Coerced {
    Token(RawValue),
    Number(f64),
}

fn parse_request(request: &SetRequest) -> Result<Coerced, EncodeError> {
    match &request.value {
        RequestValue::Number(n) if n.is_finite() => Ok(Coerced::Number(*n)),
        RequestValue::Number(_) => Err(invalid(request, "not a finite number")),
        RequestValue::Text(text) => {
            let text = text.trim();
            if let Some(idx) = boolean_token(text) {
                return Ok(Coerced::Token(idx));
            }
            text.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Coerced::Number)
                .ok_or_else(|| invalid(request, "neither an ON/OFF token nor a number"))
        }
    }
}

fn invalid(request: &SetRequest, reason: impl Into<String>) -> EncodeError {
    EncodeError::InvalidValue {
        field: request.field.clone(),
        value: request.value.to_string(),
        reason: reason.into(),
    }
}

fn number_value(n: f64) -> SemanticValue {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        SemanticValue::Int(n as i64)
    } else {
        SemanticValue::Float(n)
    }
}

/// Coerce the request into the semantic value the field declares, enforcing
/// the schema's bounds.
fn coerce(info: &FieldInfo, request: &SetRequest) -> Result<SemanticValue, EncodeError> {
    let parsed = parse_request(request)?;

    match info.kind {
        FieldKind::Binary { value_on, value_off } => {
            let idx = match parsed {
                Coerced::Token(idx) => idx,
                Coerced::Number(n) if n == 0.0 || n == 1.0 => n as RawValue,
                Coerced::Number(_) => return Err(invalid(request, "expected ON or OFF")),
            };
            let side = if idx == 1 { value_on } else { value_off };
            Ok(match side {
                BinaryValue::Token(token) => SemanticValue::text(token),
                BinaryValue::Bool(b) => SemanticValue::Bool(b),
            })
        }
        FieldKind::Numeric {
            value_min,
            value_max,
            ..
        } => {
            let n = match parsed {
                Coerced::Token(idx) => idx as f64,
                Coerced::Number(n) => n,
            };
            if let Some(min) = value_min
                && n < min
            {
                return Err(invalid(request, format!("below minimum {}", min)));
            }
            if let Some(max) = value_max
                && n > max
            {
                return Err(invalid(request, format!("above maximum {}", max)));
            }
            Ok(number_value(n))
        }
        FieldKind::Enum { values } => {
            let n = match parsed {
                Coerced::Token(idx) => idx as f64,
                Coerced::Number(n) => n,
            };
            values
                .iter()
                .find(|&&v| v as f64 == n)
                .map(|&v| SemanticValue::Int(v))
                .ok_or_else(|| invalid(request, format!("expected one of {:?}", values)))
        }
    }
}

/// Validate `request` against the schema and translate it into one write.
pub fn encode(
    schema: &CapabilitySchema,
    dictionary: &AttributeDictionary,
    request: &SetRequest,
) -> Result<WriteInstruction, EncodeError> {
    let info = schema
        .field_info(&request.field)
        .ok_or_else(|| EncodeError::UnknownField(request.field.clone()))?;
    if !info.access.is_settable() {
        return Err(EncodeError::NotWritable(request.field.clone()));
    }

    let requested = coerce(info, request)?;

    let Some(entry) = dictionary.lookup_by_field(&request.field) else {
        // Registration validates schema against dictionary, so this is a
        // family built without going through DeviceFamily::new.
        error!(
            "[Encode] Field {} is in the schema but not in the dictionary",
            request.field
        );
        return Err(EncodeError::UnknownField(request.field.clone()));
    };

    let raw = entry
        .encode(&requested)
        .map_err(|reason| invalid(request, reason))?;

    debug!(
        "[Encode] {} = {} -> {} 0x{:04X} raw {} ({})",
        entry.field, requested, entry.key.cluster, entry.key.attribute, raw, entry.data_type
    );

    Ok(WriteInstruction {
        cluster: entry.key.cluster,
        attribute: entry.key.attribute,
        data_type: entry.data_type,
        raw,
        field: entry.field,
        requested,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::dictionary::{AttributeEntry, Transform};
    use crate::schema::FieldInfo;

    const FIELDS: &[FieldInfo] = &[
        FieldInfo::switch("enable_temp", "Enable Temperature Control"),
        FieldInfo::setpoint("high_temp", "C", 0.0, 60.0, "Setting High Temperature Border"),
        FieldInfo::choice("view_disp", &[0, 1], "Display View"),
        FieldInfo::reading("temperature", "°C", "Measured temperature"),
        FieldInfo::setpoint("orphan", "C", 0.0, 10.0, "Not in the dictionary"),
    ];

    fn dictionary() -> AttributeDictionary {
        AttributeDictionary::new(
            "test",
            &[
                AttributeEntry::new(
                    Cluster::TemperatureMeasurement,
                    0x0220,
                    "enable_temp",
                    DataType::Boolean,
                    Transform::OnOff,
                ),
                AttributeEntry::new(
                    Cluster::TemperatureMeasurement,
                    0x0221,
                    "high_temp",
                    DataType::Int16,
                    Transform::Identity,
                ),
                AttributeEntry::new(
                    Cluster::PowerConfiguration,
                    0xF005,
                    "view_disp",
                    DataType::Uint8,
                    Transform::Identity,
                ),
                AttributeEntry::new(
                    Cluster::TemperatureMeasurement,
                    0x0000,
                    "temperature",
                    DataType::Int16,
                    Transform::Divide(100),
                ),
            ],
        )
        .unwrap()
    }

    fn run(field: &str, value: impl Into<RequestValue>) -> Result<WriteInstruction, EncodeError> {
        encode(&CapabilitySchema::new(FIELDS), &dictionary(), &SetRequest::new(field, value))
    }

    #[test]
    fn test_encode_setpoint_from_string() {
        let write = run("high_temp", "25").unwrap();
        assert_eq!(write.cluster, Cluster::TemperatureMeasurement);
        assert_eq!(write.attribute, 0x0221);
        assert_eq!(write.data_type, DataType::Int16);
        assert_eq!(write.raw, 25);
        assert_eq!(write.requested, SemanticValue::Int(25));
        assert_eq!(
            write.optimistic_state().get("high_temp"),
            Some(&SemanticValue::Int(25))
        );
    }

    #[test]
    fn test_encode_setpoint_from_number() {
        assert_eq!(run("high_temp", 60.0).unwrap().raw, 60);
    }

    #[test]
    fn test_bounds_enforced() {
        for value in ["-1", "61", "1000"] {
            assert!(matches!(
                run("high_temp", value),
                Err(EncodeError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(run("enable_temp", "ON").unwrap().raw, 1);
        assert_eq!(run("enable_temp", "OFF").unwrap().raw, 0);
        assert_eq!(
            run("enable_temp", 1.0).unwrap().requested,
            SemanticValue::text("ON")
        );
        assert!(run("enable_temp", "MAYBE").is_err());
        assert!(run("enable_temp", 2.0).is_err());
    }

    #[test]
    fn test_token_lookup_applies_to_numeric_fields() {
        let write = run("view_disp", "ON").unwrap();
        assert_eq!(write.raw, 1);
        assert_eq!(write.cluster, Cluster::PowerConfiguration);
        assert!(run("view_disp", "3").is_err());
    }

    #[test]
    fn test_fraction_rejected_for_integer_attribute() {
        assert!(matches!(
            run("high_temp", "25.5"),
            Err(EncodeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_and_read_only_fields() {
        assert_eq!(
            run("low_temp", "5"),
            Err(EncodeError::UnknownField("low_temp".to_string()))
        );
        assert_eq!(
            run("temperature", "21"),
            Err(EncodeError::NotWritable("temperature".to_string()))
        );
        assert_eq!(
            run("orphan", "5"),
            Err(EncodeError::UnknownField("orphan".to_string()))
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            run("high_temp", "warm"),
            Err(EncodeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_payload_format() {
        let write = run("high_temp", "25").unwrap();
        assert_eq!(
            write.payload(),
            serde_json::json!({ "545": { "value": 25, "type": 0x29 } })
        );
    }
}
