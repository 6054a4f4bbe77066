//! Field names that carry citation properties inside a host document.
//!
//! A host document stores each citation marker under a name such as
//! `bibendum_3_eyJjaXRlX3JlZiI6WyJqb245MCJdfQ_x061x__x061x_`: the namespace
//! prefix, an index that keeps names unique, and the escaped payload.
//! [`FieldCodec`] writes and reads those names.

mod codec;

pub use codec::{FieldCodec, DEFAULT_PREFIX, PROTECTED_CHARS};

use serde_json::Value;
use std::collections::BTreeMap;

/// Property map stored in a field
pub type Properties = BTreeMap<String, Value>;

/// Errors raised while reading or writing field names
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The name carries the namespace prefix but its payload cannot be read
    #[error("Corrupted field '{name}': {reason}")]
    Corrupted { name: String, reason: String },

    /// The properties cannot be serialized
    #[error("Serialize error: {0}")]
    Serialize(String),

    /// The payload decoded but is not a valid citation
    #[error("Invalid citation in field: {0}")]
    Citation(#[from] crate::models::CitationError),
}
