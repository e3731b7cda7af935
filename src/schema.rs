//! Capability schema.
//!
//! Declares which semantic fields a device family exposes, whether they can be
//! set, and their units and bounds. The encode pipeline uses it as the
//! validation gate; the application layer receives it serialized as an
//! "exposes" list to generate its UI.

use serde::Serialize;

/// Who may touch a field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Reported by the device only.
    State,
    /// Reported by the device and settable by the application.
    StateSet,
}

impl Access {
    pub fn is_settable(self) -> bool {
        matches!(self, Access::StateSet)
    }
}

/// Value published for one side of a binary field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BinaryValue {
    Token(&'static str),
    Bool(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Binary {
        value_on: BinaryValue,
        value_off: BinaryValue,
    },
    Numeric {
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value_min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value_max: Option<f64>,
    },
    Enum {
        values: &'static [i64],
    },
}

/// Declaration of one semantic field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub access: Access,
    pub description: &'static str,
}

impl FieldInfo {
    /// Settable ON/OFF switch.
    pub const fn switch(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Binary {
                value_on: BinaryValue::Token("ON"),
                value_off: BinaryValue::Token("OFF"),
            },
            access: Access::StateSet,
            description,
        }
    }

    /// Read-only true/false flag.
    pub const fn flag(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Binary {
                value_on: BinaryValue::Bool(true),
                value_off: BinaryValue::Bool(false),
            },
            access: Access::State,
            description,
        }
    }

    /// Settable number within `[min, max]`.
    pub const fn setpoint(
        name: &'static str,
        unit: &'static str,
        min: f64,
        max: f64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Numeric {
                unit: Some(unit),
                value_min: Some(min),
                value_max: Some(max),
            },
            access: Access::StateSet,
            description,
        }
    }

    /// Read-only measurement.
    pub const fn reading(name: &'static str, unit: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Numeric {
                unit: Some(unit),
                value_min: None,
                value_max: None,
            },
            access: Access::State,
            description,
        }
    }

    /// Settable choice among numeric values.
    pub const fn choice(name: &'static str, values: &'static [i64], description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Enum { values },
            access: Access::StateSet,
            description,
        }
    }

    pub fn min(&self) -> Option<f64> {
        match self.kind {
            FieldKind::Numeric { value_min, .. } => value_min,
            _ => None,
        }
    }

    pub fn max(&self) -> Option<f64> {
        match self.kind {
            FieldKind::Numeric { value_max, .. } => value_max,
            _ => None,
        }
    }

    /// Accepted enumeration values, if the field is an enumeration.
    pub fn enum_values(&self) -> Option<&'static [i64]> {
        match self.kind {
            FieldKind::Enum { values } => Some(values),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, FieldKind::Binary { .. })
    }
}

/// The set of fields one device family exposes, in presentation order.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(transparent)]
pub struct CapabilitySchema {
    fields: &'static [FieldInfo],
}

impl CapabilitySchema {
    pub const fn new(fields: &'static [FieldInfo]) -> Self {
        Self { fields }
    }

    pub fn field_info(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldInfo] = &[
        FieldInfo::switch("enable_temp", "Enable Temperature Control"),
        FieldInfo::setpoint("high_temp", "C", 0.0, 60.0, "Setting High Temperature Border"),
        FieldInfo::choice("view_disp", &[0, 1], "Display View"),
        FieldInfo::flag("battery_low", "Battery low"),
    ];

    #[test]
    fn test_field_info() {
        let schema = CapabilitySchema::new(FIELDS);
        let high = schema.field_info("high_temp").unwrap();
        assert_eq!(high.min(), Some(0.0));
        assert_eq!(high.max(), Some(60.0));
        assert!(high.access.is_settable());
        assert_eq!(schema.field_info("view_disp").unwrap().enum_values(), Some(&[0, 1][..]));
        assert!(!schema.field_info("battery_low").unwrap().access.is_settable());
        assert!(schema.field_info("missing").is_none());
    }

    #[test]
    fn test_exposes_json() {
        let json = serde_json::to_value(CapabilitySchema::new(FIELDS)).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({
                "name": "enable_temp",
                "type": "binary",
                "value_on": "ON",
                "value_off": "OFF",
                "access": "state_set",
                "description": "Enable Temperature Control",
            })
        );
        assert_eq!(json[1]["type"], "numeric");
        assert_eq!(json[1]["unit"], "C");
        assert_eq!(json[1]["value_max"], 60.0);
        assert_eq!(json[2]["values"], serde_json::json!([0, 1]));
        assert_eq!(json[3]["value_on"], true);
    }
}
