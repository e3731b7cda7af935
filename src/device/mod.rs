//! Device families and their registry.

pub mod efekta;
pub mod family;
pub mod registry;

pub use family::{DeviceFamily, DeviceFamilyDefinition, DeviceIdentity};
pub use registry::{BUILTIN_FAMILIES, FamilyRegistry};
