//! Registry of device families, keyed by model identifier.
//!
//! Registration is an explicit, ordered load step at startup. Once loaded the
//! registry is read-only and families can be shared across tasks.

use super::efekta;
use super::family::{DeviceFamily, DeviceFamilyDefinition};
use crate::error::{AdapterError, Result};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

/// Families available in this build, in load order.
pub const BUILTIN_FAMILIES: &[DeviceFamilyDefinition] = &[efekta::EON29WZ];

#[derive(Debug, Default)]
pub struct FamilyRegistry {
    families: Vec<Arc<DeviceFamily>>,
    by_model: HashMap<&'static str, usize>,
}

impl FamilyRegistry {
    /// Validate and register `definitions` in order. Any inconsistency aborts
    /// the whole load.
    pub fn load(definitions: &[DeviceFamilyDefinition]) -> Result<Self> {
        let mut registry = Self::default();
        for definition in definitions {
            registry.register(DeviceFamily::new(definition)?)?;
        }
        Ok(registry)
    }

    /// Registry holding the built-in families.
    pub fn builtin() -> Result<Self> {
        Self::load(BUILTIN_FAMILIES)
    }

    fn register(&mut self, family: DeviceFamily) -> Result<()> {
        let identity = *family.identity();
        let idx = self.families.len();

        let mut keys: Vec<&'static str> = identity.zigbee_models.to_vec();
        if !keys.contains(&identity.model) {
            keys.push(identity.model);
        }
        for key in &keys {
            if self.by_model.contains_key(key) {
                return Err(AdapterError::DuplicateModel(key.to_string()));
            }
        }
        for key in keys {
            self.by_model.insert(key, idx);
        }

        info!(
            "[Registry] Registered {} ({}): {} attributes, {} fields, {} reporting rules",
            identity.model,
            identity.vendor,
            family.dictionary().len(),
            family.schema().len(),
            family.plan().reporting_rules().len()
        );
        self.families.push(Arc::new(family));
        Ok(())
    }

    /// Look up a family by Zigbee model id or model name.
    pub fn lookup(&self, model: &str) -> Option<Arc<DeviceFamily>> {
        self.by_model
            .get(model)
            .map(|&idx| Arc::clone(&self.families[idx]))
    }

    /// Like [`lookup`](Self::lookup), but unknown models are an error.
    pub fn require(&self, model: &str) -> Result<Arc<DeviceFamily>> {
        self.lookup(model)
            .ok_or_else(|| AdapterError::UnknownModel(model.to_string()))
    }

    /// Families in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<DeviceFamily>> {
        self.families.iter()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
