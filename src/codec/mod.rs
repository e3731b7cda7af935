//! Attribute codec.
//!
//! Translates between raw ZCL attribute values and the semantic state the
//! application layer works with, in both directions. All functions here are
//! pure: they read an immutable dictionary and return their results.

pub mod decode;
pub mod dictionary;
pub mod encode;
pub mod value;

pub use decode::{AttributeEvent, DecodeOutcome, EventKind, decode};
pub use dictionary::{AttributeDictionary, AttributeEntry, AttributeKey, Transform};
pub use encode::{RequestValue, SetRequest, WriteInstruction, encode};
pub use value::{RawValue, SemanticState, SemanticValue};
