//! Textual encode/decode wrappers over the structured round-trip.
//!
//! [`stringify`] and [`parse`] are the only points where text encoding
//! happens; the serializer and deserializer proper operate on structured
//! records so they stay composable with non-text transports.
//!
//! These are also the only throwing entry points: handing `parse`
//! malformed JSON or a payload that is not an object is a caller bug
//! surfaced immediately, never papered over into a corrupt error object.

use std::error::Error as StdError;

use serde_json::Value;

use crate::fault::Fault;
use crate::record::{ErrorRecord, json_type_name};
use crate::revive::{VariantRegistry, default_registry};
use crate::serialize::serialize;

/// Errors from the textual encode/decode boundary.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON rendering or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed, but is not a JSON object.
    #[error("expected a JSON object, got {0}")]
    NotARecord(&'static str),
}

/// Renders an error as JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if JSON rendering fails.
pub fn stringify(error: &(dyn StdError + 'static)) -> Result<String, CodecError> {
    let record = serialize(error);
    Ok(serde_json::to_string(&record)?)
}

/// Parses JSON text into a live fault using the process-wide registry.
///
/// Accepts anything byte-like (`&str`, `String`, `&[u8]`, `Vec<u8>`).
///
/// # Errors
///
/// Returns [`CodecError::Json`] on malformed JSON or invalid UTF-8, and
/// [`CodecError::NotARecord`] when the payload is not a JSON object.
pub fn parse(text: impl AsRef<[u8]>) -> Result<Fault, CodecError> {
    parse_with(text, default_registry())
}

/// Parses JSON text into a live fault using the given registry.
///
/// # Errors
///
/// Same contract as [`parse`].
pub fn parse_with(text: impl AsRef<[u8]>, registry: &VariantRegistry) -> Result<Fault, CodecError> {
    let value: Value = serde_json::from_slice(text.as_ref())?;
    let Value::Object(map) = &value else {
        return Err(CodecError::NotARecord(json_type_name(&value)));
    };
    Ok(registry.revive(&ErrorRecord::from_object(map)))
}
