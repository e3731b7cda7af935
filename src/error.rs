use crate::codec::value::RawValue;
use crate::zcl::{AttributeId, Cluster};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Crate-level errors. Raised while registering device families or by the CLI;
/// the per-attribute and per-request errors below never surface through here.
#[derive(ThisError, Debug)]
pub enum AdapterError {
    #[error("Dictionary inconsistency in {model}: {reason}")]
    DictionaryInconsistency { model: String, reason: String },

    #[error("Device model registered twice: {0}")]
    DuplicateModel(String),

    #[error("Unknown device model: {0}")]
    UnknownModel(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;

/// A single attribute in an inbound event could not be decoded.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("Cannot decode {field} ({cluster} 0x{attribute:04X}) from raw value {raw}: {reason}")]
pub struct DecodeError {
    pub field: &'static str,
    pub cluster: Cluster,
    pub attribute: AttributeId,
    pub raw: RawValue,
    pub reason: String,
}

/// A set request was rejected before any write was attempted.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field {0} is read-only")]
    NotWritable(String),
}

/// Failure reported by the host bridge's transport for one bind or
/// configure-reporting call.
#[derive(ThisError, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Non-fatal commissioning failure, recorded in the report.
#[derive(ThisError, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommissioningWarning {
    #[error("Bind of {cluster} failed: {source}")]
    BindFailure {
        cluster: Cluster,
        source: TransportError,
    },

    #[error("Configure reporting of {cluster} 0x{attribute:04X} failed: {source}")]
    ConfigureFailure {
        cluster: Cluster,
        attribute: AttributeId,
        source: TransportError,
    },
}
