//! Device family descriptors.
//!
//! A family bundles everything the adapter knows about one hardware model:
//! its attribute dictionary, capability schema and commissioning plan. Families
//! are declared as `const` definitions and validated once when registered.

use crate::codec::{
    self, AttributeDictionary, AttributeEntry, AttributeEvent, DecodeOutcome, SetRequest,
    Transform, WriteInstruction,
};
use crate::commissioning::{
    CommissioningPlan, CommissioningReport, CommissioningTransport, Sequencer, run_commissioning,
};
use crate::error::{AdapterError, EncodeError, Result};
use crate::schema::{CapabilitySchema, FieldKind};
use log::warn;
use serde::Serialize;

/// How the hardware identifies itself, and how it is presented.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DeviceIdentity {
    /// Model identifiers reported by the device's Basic cluster.
    pub zigbee_models: &'static [&'static str],
    pub model: &'static str,
    pub vendor: &'static str,
    pub description: &'static str,
}

/// Static, unvalidated family declaration.
#[derive(Clone, Copy, Debug)]
pub struct DeviceFamilyDefinition {
    pub identity: DeviceIdentity,
    pub attributes: &'static [AttributeEntry],
    pub schema: CapabilitySchema,
    pub plan: CommissioningPlan,
}

/// Validated, immutable device family.
#[derive(Debug)]
pub struct DeviceFamily {
    identity: DeviceIdentity,
    dictionary: AttributeDictionary,
    schema: CapabilitySchema,
    plan: CommissioningPlan,
}

impl DeviceFamily {
    /// Validate `definition` and build the family.
    ///
    /// Fails if the dictionary has collisions, if the schema names a field the
    /// dictionary cannot translate, or if the plan reports on a cluster it never
    /// binds or with a type that disagrees with the dictionary.
    pub fn new(definition: &DeviceFamilyDefinition) -> Result<Self> {
        let model = definition.identity.model;
        let inconsistency = |reason: String| AdapterError::DictionaryInconsistency {
            model: model.to_string(),
            reason,
        };

        let dictionary = AttributeDictionary::new(model, definition.attributes)?;

        for info in definition.schema.iter() {
            let entry = dictionary
                .lookup_by_field(info.name)
                .ok_or_else(|| inconsistency(format!("schema field {} has no attribute", info.name)))?;

            let binary_transform = matches!(entry.transform, Transform::OnOff | Transform::AnyBit(_));
            if matches!(info.kind, FieldKind::Binary { .. }) != binary_transform {
                return Err(inconsistency(format!(
                    "field {} is declared {:?} but translated with {:?}",
                    info.name, info.kind, entry.transform
                )));
            }
        }

        for entry in dictionary.iter() {
            if definition.schema.field_info(entry.field).is_none() {
                warn!(
                    "[Registry] {}: attribute field {} is not exposed in the schema",
                    model, entry.field
                );
            }
        }

        if let Some(rule) = definition.plan.unbound_rules().next() {
            return Err(inconsistency(format!(
                "reporting rule for {} 0x{:04X} targets an unbound cluster",
                rule.cluster, rule.attribute
            )));
        }

        for rule in definition.plan.reporting_rules() {
            if let Some(entry) = dictionary.lookup_by_key(rule.cluster, rule.attribute)
                && entry.data_type != rule.data_type
            {
                return Err(inconsistency(format!(
                    "reporting rule for {} 0x{:04X} uses {} but the attribute is {}",
                    rule.cluster, rule.attribute, rule.data_type, entry.data_type
                )));
            }
        }

        Ok(Self {
            identity: definition.identity,
            dictionary,
            schema: definition.schema,
            plan: definition.plan,
        })
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn model(&self) -> &'static str {
        self.identity.model
    }

    pub fn dictionary(&self) -> &AttributeDictionary {
        &self.dictionary
    }

    pub fn schema(&self) -> &CapabilitySchema {
        &self.schema
    }

    pub fn plan(&self) -> &CommissioningPlan {
        &self.plan
    }

    /// Decode an inbound report or read response.
    pub fn decode(&self, event: &AttributeEvent) -> DecodeOutcome {
        codec::decode(&self.dictionary, event)
    }

    /// Translate a set request into a single attribute write.
    pub fn encode(&self, request: &SetRequest) -> std::result::Result<WriteInstruction, EncodeError> {
        codec::encode(&self.schema, &self.dictionary, request)
    }

    /// Sequencer for one device of this family.
    pub fn sequencer(&self) -> Sequencer<'_> {
        Sequencer::new(self.identity.model, &self.plan)
    }

    /// Run the commissioning plan once against `transport`.
    pub async fn commission<T>(&self, transport: &T) -> CommissioningReport
    where
        T: CommissioningTransport + ?Sized,
    {
        run_commissioning(self.identity.model, &self.plan, transport).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commissioning::ReportingRule;
    use crate::schema::FieldInfo;
    use crate::zcl::{Cluster, DataType};

    const IDENTITY: DeviceIdentity = DeviceIdentity {
        zigbee_models: &["TEST_1"],
        model: "TEST_1",
        vendor: "Test",
        description: "Test device",
    };
    const ATTRIBUTES: &[AttributeEntry] = &[
        AttributeEntry::new(
            Cluster::TemperatureMeasurement,
            0x0000,
            "temperature",
            DataType::Int16,
            Transform::Divide(100),
        ),
        AttributeEntry::new(
            Cluster::TemperatureMeasurement,
            0x0220,
            "enable_temp",
            DataType::Boolean,
            Transform::OnOff,
        ),
    ];
    const FIELDS: &[FieldInfo] = &[
        FieldInfo::reading("temperature", "°C", "Temperature"),
        FieldInfo::switch("enable_temp", "Enable"),
    ];
    const RULES: &[ReportingRule] = &[ReportingRule::new(
        Cluster::TemperatureMeasurement,
        0x0000,
        DataType::Int16,
        0,
        1800,
        0,
    )];

    fn definition() -> DeviceFamilyDefinition {
        DeviceFamilyDefinition {
            identity: IDENTITY,
            attributes: ATTRIBUTES,
            schema: CapabilitySchema::new(FIELDS),
            plan: CommissioningPlan::new(&[Cluster::TemperatureMeasurement], RULES),
        }
    }

    #[test]
    fn test_valid_family() {
        let family = DeviceFamily::new(&definition()).unwrap();
        assert_eq!(family.model(), "TEST_1");
        assert_eq!(family.sequencer().state(), crate::commissioning::CommissioningState::Idle);
    }

    #[test]
    fn test_schema_field_without_attribute() {
        const EXTRA: &[FieldInfo] = &[
            FieldInfo::reading("temperature", "°C", "Temperature"),
            FieldInfo::setpoint("high_temp", "C", 0.0, 60.0, "High"),
        ];
        let def = DeviceFamilyDefinition {
            schema: CapabilitySchema::new(EXTRA),
            ..definition()
        };
        let err = DeviceFamily::new(&def).unwrap_err();
        assert!(matches!(err, AdapterError::DictionaryInconsistency { .. }));
    }

    #[test]
    fn test_binary_field_needs_boolean_transform() {
        const WRONG: &[FieldInfo] = &[
            FieldInfo::switch("temperature", "Temperature"),
            FieldInfo::switch("enable_temp", "Enable"),
        ];
        let def = DeviceFamilyDefinition {
            schema: CapabilitySchema::new(WRONG),
            ..definition()
        };
        assert!(DeviceFamily::new(&def).is_err());
    }

    #[test]
    fn test_rule_on_unbound_cluster() {
        let def = DeviceFamilyDefinition {
            plan: CommissioningPlan::new(&[Cluster::Time], RULES),
            ..definition()
        };
        assert!(DeviceFamily::new(&def).is_err());
    }

    #[test]
    fn test_rule_type_mismatch() {
        const BAD_RULES: &[ReportingRule] = &[ReportingRule::new(
            Cluster::TemperatureMeasurement,
            0x0000,
            DataType::Uint16,
            0,
            1800,
            0,
        )];
        let def = DeviceFamilyDefinition {
            plan: CommissioningPlan::new(&[Cluster::TemperatureMeasurement], BAD_RULES),
            ..definition()
        };
        assert!(DeviceFamily::new(&def).is_err());
    }
}
