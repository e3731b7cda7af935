//! Zigbee attribute adapter library.
//!
//! Teaches a Zigbee bridge how to read vendor attributes on standard clusters,
//! how to turn application set requests back into attribute writes, and how to
//! bring a freshly joined device up with its bindings and reporting rules.

pub mod codec;
pub mod commissioning;
pub mod config;
pub mod device;
pub mod error;
pub mod schema;
pub mod zcl;
