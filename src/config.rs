use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

pub fn load_dotenv_from(env_path: &Path) {
    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: called from main before the async runtime starts any threads
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Find the first '=' and split there
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();

            // Remove surrounding quotes if present
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            pairs.push((key, value));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub adapter: AdapterConfig,
    pub commissioning: CommissioningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Device model used when none is given on the command line.
    pub default_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissioningConfig {
    /// Device endpoint the plan's clusters live on.
    pub endpoint: u8,
    /// Coordinator endpoint clusters are bound to.
    pub coordinator_endpoint: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adapter: AdapterConfig {
                default_model: "EFEKTA_eON29wz".to_string(),
            },
            commissioning: CommissioningConfig {
                endpoint: 1,
                coordinator_endpoint: 1,
            },
        }
    }
}

impl Config {
    /// Defaults overridden by `ADAPTER_*` environment variables. Values that
    /// do not parse are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(model) = lookup("ADAPTER_DEFAULT_MODEL") {
            config.adapter.default_model = model;
        }
        if let Some(e) = parse_var(&lookup, "ADAPTER_ENDPOINT") {
            config.commissioning.endpoint = e;
        }
        if let Some(e) = parse_var(&lookup, "ADAPTER_COORDINATOR_ENDPOINT") {
            config.commissioning.coordinator_endpoint = e;
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={}: not a valid value", key, value);
            None
        }
    }
}
