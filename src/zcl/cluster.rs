//! Zigbee Cluster Library cluster identifiers.
//!
//! Clusters are named the way the host bridge names them (`genPowerCfg`,
//! `msTemperatureMeasurement`, ...) so bind and configure-reporting calls can be
//! handed to the transport by name.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// Clusters referenced by the built-in device families.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    FromRepr,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum Cluster {
    #[strum(serialize = "genBasic")]
    #[serde(rename = "genBasic")]
    Basic = 0x0000,
    #[strum(serialize = "genPowerCfg")]
    #[serde(rename = "genPowerCfg")]
    PowerConfiguration = 0x0001,
    #[strum(serialize = "genTime")]
    #[serde(rename = "genTime")]
    Time = 0x000A,
    #[strum(serialize = "msTemperatureMeasurement")]
    #[serde(rename = "msTemperatureMeasurement")]
    TemperatureMeasurement = 0x0402,
    #[strum(serialize = "msPressureMeasurement")]
    #[serde(rename = "msPressureMeasurement")]
    PressureMeasurement = 0x0403,
    #[strum(serialize = "msRelativeHumidity")]
    #[serde(rename = "msRelativeHumidity")]
    RelativeHumidity = 0x0405,
}

impl Cluster {
    /// Numeric cluster id as carried on the air.
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Bridge-side cluster name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Resolve a cluster from either its bridge name or a numeric id
    /// (`0x0402` or `1026`).
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(cluster) = input.parse::<Cluster>() {
            return Some(cluster);
        }
        let id = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16).ok()?,
            None => input.parse::<u16>().ok()?,
        };
        Self::from_repr(id)
    }
}

/// Cluster as carried by an inbound event.
///
/// Devices report on clusters no family maps; those still have to be
/// representable so decoding can ignore them instead of rejecting the event.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterRef {
    Known(Cluster),
    Id(u16),
    Name(String),
}

impl ClusterRef {
    /// Resolve a name or numeric id, falling back to an unresolved reference.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(cluster) = Cluster::parse(input) {
            return ClusterRef::Known(cluster);
        }
        let id = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16).ok(),
            None => input.parse::<u16>().ok(),
        };
        match id {
            Some(id) => ClusterRef::Id(id),
            None => ClusterRef::Name(input.to_string()),
        }
    }

    /// The cluster this reference names, if it is one of ours.
    pub fn known(&self) -> Option<Cluster> {
        match self {
            ClusterRef::Known(cluster) => Some(*cluster),
            ClusterRef::Id(id) => Cluster::from_repr(*id),
            ClusterRef::Name(name) => Cluster::parse(name),
        }
    }
}

impl From<Cluster> for ClusterRef {
    fn from(cluster: Cluster) -> Self {
        ClusterRef::Known(cluster)
    }
}

impl fmt::Display for ClusterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterRef::Known(cluster) => write!(f, "{}", cluster),
            ClusterRef::Id(id) => write!(f, "0x{:04X}", id),
            ClusterRef::Name(name) => f.write_str(name),
        }
    }
}
