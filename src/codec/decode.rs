//! Decode pipeline: inbound attribute reports to semantic state updates.

use super::dictionary::AttributeDictionary;
use super::value::{RawValue, SemanticState};
use crate::error::DecodeError;
use crate::zcl::{AttributeId, ClusterRef};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of inbound message carrying attribute values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    #[default]
    AttributeReport,
    ReadResponse,
}

/// Attribute values from one cluster, as delivered by the transport. The
/// cluster may be one no device family maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEvent {
    pub cluster: ClusterRef,
    #[serde(default)]
    pub kind: EventKind,
    pub attributes: BTreeMap<AttributeId, RawValue>,
}

impl AttributeEvent {
    pub fn report(cluster: impl Into<ClusterRef>) -> Self {
        Self {
            cluster: cluster.into(),
            kind: EventKind::AttributeReport,
            attributes: BTreeMap::new(),
        }
    }

    pub fn read_response(cluster: impl Into<ClusterRef>) -> Self {
        Self {
            kind: EventKind::ReadResponse,
            ..Self::report(cluster)
        }
    }

    pub fn with(mut self, attribute: AttributeId, raw: RawValue) -> Self {
        self.attributes.insert(attribute, raw);
        self
    }
}

/// Result of decoding one event: the fields that decoded, plus one error per
/// attribute that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeOutcome {
    pub state: SemanticState,
    pub errors: Vec<DecodeError>,
}

impl DecodeOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode every attribute of `event` the dictionary knows about.
///
/// Unknown clusters and attribute ids are skipped. A malformed value only
/// drops its own attribute; the rest of the event is still decoded.
pub fn decode(dictionary: &AttributeDictionary, event: &AttributeEvent) -> DecodeOutcome {
    let mut outcome = DecodeOutcome::default();

    let Some(cluster) = event.cluster.known() else {
        trace!("[Decode] Ignoring event on unmapped cluster {}", event.cluster);
        return outcome;
    };

    for (&attribute, &raw) in &event.attributes {
        let Some(entry) = dictionary.lookup_by_key(cluster, attribute) else {
            trace!(
                "[Decode] Ignoring unknown attribute {} 0x{:04X}",
                cluster, attribute
            );
            continue;
        };

        match entry.decode(raw) {
            Ok(value) => {
                debug!("[Decode] {} = {} (raw {})", entry.field, value, raw);
                outcome.state.insert(entry.field, value);
            }
            Err(reason) => {
                let err = DecodeError {
                    field: entry.field,
                    cluster,
                    attribute,
                    raw,
                    reason,
                };
                warn!("[Decode] {}", err);
                outcome.errors.push(err);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::dictionary::{AttributeEntry, Transform};
    use crate::codec::value::SemanticValue;
    use crate::zcl::{Cluster, DataType};

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
                    Cluster::RelativeHumidity,
                    0x0221,
                    "high_hum",
                    DataType::Uint16,
                    Transform::Identity,
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_decode_multiple_attributes() {
        let event = AttributeEvent::report(Cluster::TemperatureMeasurement)
            .with(0x0220, 1)
            .with(0x0221, 25);
        let outcome = decode(&dictionary(), &event);

        assert!(outcome.is_clean());
        assert_eq!(outcome.state.get("enable_temp"), Some(&SemanticValue::text("ON")));
        assert_eq!(outcome.state.get("high_temp"), Some(&SemanticValue::Int(25)));
    }

    #[test]
    fn test_attribute_resolved_within_event_cluster() {
        let event = AttributeEvent::read_response(Cluster::RelativeHumidity).with(0x0221, 70);
        let outcome = decode(&dictionary(), &event);

        assert_eq!(outcome.state.len(), 1);
        assert_eq!(outcome.state.get("high_hum"), Some(&SemanticValue::Int(70)));
    }

    #[test]
    fn test_unknown_attributes_ignored() {
        let dict = dictionary();
        let plain = AttributeEvent::report(Cluster::TemperatureMeasurement).with(0x0221, 30);
        let noisy = plain.clone().with(0x0000, 2150).with(0x4242, 7);

        assert_eq!(decode(&dict, &plain), decode(&dict, &noisy));
    }

    #[test]
    fn test_empty_event_is_noop() {
        let outcome = decode(&dictionary(), &AttributeEvent::report(Cluster::Time));
        assert!(outcome.state.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_unmapped_cluster_is_noop() {
        let dict = dictionary();
        let event: AttributeEvent =
            serde_json::from_str(r#"{"cluster":"genOnOff","attributes":{"0":1}}"#).unwrap();
        let outcome = decode(&dict, &event);
        assert!(outcome.state.is_empty());
        assert!(outcome.is_clean());

        let by_id = AttributeEvent::report(ClusterRef::Id(0x0006)).with(0x0221, 1);
        assert_eq!(decode(&dict, &by_id), DecodeOutcome::default());
    }

    #[test]
    fn test_event_cluster_by_numeric_id() {
        let event: AttributeEvent =
            serde_json::from_str(r#"{"cluster":1026,"attributes":{"545":30}}"#).unwrap();
        let outcome = decode(&dictionary(), &event);
        assert_eq!(outcome.state.get("high_temp"), Some(&SemanticValue::Int(30)));
    }

    #[test]
    fn test_malformed_attribute_isolated() {
        let event = AttributeEvent::report(Cluster::TemperatureMeasurement)
            .with(0x0220, 5)
            .with(0x0221, 40);
        let outcome = decode(&dictionary(), &event);

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, "enable_temp");
        assert_eq!(outcome.errors[0].raw, 5);
        assert_eq!(outcome.state.len(), 1);
        assert_eq!(outcome.state.get("high_temp"), Some(&SemanticValue::Int(40)));
    }

    #[test]
    fn test_event_from_json() {
        let event: AttributeEvent = serde_json::from_str(
            r#"{"cluster":"msTemperatureMeasurement","kind":"readResponse","attributes":{"545":12}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::ReadResponse);
        assert_eq!(event.attributes.get(&0x0221), Some(&12));
    }
}
