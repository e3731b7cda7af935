//! Zigbee Cluster Library identifiers used by the attribute codec.

pub mod cluster;
pub mod data_type;

pub use cluster::{Cluster, ClusterRef};
pub use data_type::DataType;

/// Attribute id within a cluster.
pub type AttributeId = u16;
