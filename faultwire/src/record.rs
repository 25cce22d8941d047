//! Transport record: the JSON-compatible shape of a serialized error.
//!
//! An [`ErrorRecord`] is the single contract shared by both sides of a
//! process or network boundary. It is produced by the serializer, rendered
//! to text by the encode wrapper, and consumed by the deserializer on the
//! receiving side. Records are short-lived value objects with no identity
//! beyond their content.
//!
//! # Wire Format
//!
//! Records serialize to JSON with camelCase field names:
//!
//! ```json
//! {
//!     "name": "TypeError",
//!     "message": "bad input",
//!     "code": "E1",
//!     "cause": { "name": "Error", "message": "root failure" }
//! }
//! ```
//!
//! Reading a record is tolerant by design: missing or malformed optional
//! fields degrade to defaults instead of failing, so a record produced by a
//! newer or foreign implementation still reconstructs into *some* usable
//! error.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder message used when a source error carries no usable message.
pub const UNKNOWN_MESSAGE: &str = "unknown error";

/// Upper bound on the length of a `cause` chain.
///
/// Links beyond this depth are truncated rather than followed, so an
/// adversarial or accidentally self-referential input cannot drive
/// unbounded recursion.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// Field names owned by the record schema.
///
/// Extra fields copied through the extensibility escape hatch must never
/// collide with these. `type` is reserved as the legacy discriminator key.
pub(crate) const RESERVED_FIELDS: &[&str] = &[
    "name",
    "type",
    "message",
    "code",
    "stack",
    "cause",
    "errors",
    "actual",
    "expected",
    "operator",
    "statusCode",
    "statusMessage",
];

/// A machine-readable error code: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Code {
    /// Symbolic code such as `"ERR_HTTP_STATUS_500"`.
    Str(String),
    /// Numeric code.
    Int(i64),
}

impl Code {
    /// Returns the string form, if this code is symbolic.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns the numeric form, if this code is an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Str(_) => None,
            Self::Int(n) => Some(*n),
        }
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Code {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

/// The serialized form of an error.
///
/// `name` acts as the kind discriminator; the remaining fields are either
/// common to all kinds or specific to one (aggregate `errors`, assertion
/// `actual`/`expected`/`operator`, HTTP `statusCode`/`statusMessage`).
/// Unrecognized primitive-valued fields ride along in [`extra`](Self::extra)
/// so foreign kinds lose no information.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Kind discriminator, `"Error"` when the source had none.
    pub name: String,
    /// Human-readable message, [`UNKNOWN_MESSAGE`] when the source had none.
    pub message: String,
    /// Machine-readable code, kept only when string or integer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
    /// Diagnostic trace, kept only when already a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// The failure that triggered this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorRecord>>,
    /// Ordered sub-errors of an aggregate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorRecord>>,
    /// Assertion: the value that was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    /// Assertion: the value that was expected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Assertion: the comparison operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// HTTP variants: the status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// HTTP variants: the status text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Additional primitive-valued fields copied through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ErrorRecord {
    /// Creates a record with the given discriminator and message.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Reads a record out of a JSON value.
    ///
    /// Accepts a JSON object, or a bare JSON string which is treated as
    /// `{"message": <string>}`. Returns `None` for any other value type.
    /// Within an object, missing or malformed fields degrade to defaults;
    /// this never fails.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_object(map)),
            Value::String(message) => Some(Self::new("Error", message.clone())),
            _ => None,
        }
    }

    /// Reads a record out of a JSON object, defaulting malformed fields.
    #[must_use]
    pub fn from_object(map: &Map<String, Value>) -> Self {
        Self::from_object_at(map, 0)
    }

    fn from_object_at(map: &Map<String, Value>, depth: usize) -> Self {
        // Legacy records carry the discriminator under `type`; both keys
        // are accepted on input, `name` wins.
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| map.get("type").and_then(Value::as_str))
            .unwrap_or("Error")
            .to_owned();

        let message = map.get("message").map_or_else(
            || UNKNOWN_MESSAGE.to_owned(),
            |value| coerce_message(value).unwrap_or_else(|| UNKNOWN_MESSAGE.to_owned()),
        );

        let code = map.get("code").and_then(|value| match value {
            Value::String(s) => Some(Code::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(Code::Int),
            _ => None,
        });

        let stack = map
            .get("stack")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let cause = map.get("cause").and_then(Value::as_object).and_then(|nested| {
            if depth < MAX_CAUSE_DEPTH {
                Some(Box::new(Self::from_object_at(nested, depth + 1)))
            } else {
                #[cfg(feature = "telemetry")]
                tracing::debug!(depth, "cause chain exceeds depth bound, truncating");
                None
            }
        });

        // Malformed entries are skipped rather than failing the whole list.
        let errors = map.get("errors").and_then(Value::as_array).map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    entry
                        .as_object()
                        .map(|nested| Self::from_object_at(nested, depth + 1))
                })
                .collect()
        });

        let actual = map.get("actual").cloned();
        let expected = map.get("expected").cloned();
        let operator = map
            .get("operator")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let status_code = map
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());
        let status_message = map
            .get("statusMessage")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let extra = map
            .iter()
            .filter(|(key, value)| {
                !RESERVED_FIELDS.contains(&key.as_str()) && is_primitive(value)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            name,
            message,
            code,
            stack,
            cause,
            errors,
            actual,
            expected,
            operator,
            status_code,
            status_message,
            extra,
        }
    }
}

impl Default for ErrorRecord {
    fn default() -> Self {
        Self {
            name: "Error".to_owned(),
            message: UNKNOWN_MESSAGE.to_owned(),
            code: None,
            stack: None,
            cause: None,
            errors: None,
            actual: None,
            expected: None,
            operator: None,
            status_code: None,
            status_message: None,
            extra: BTreeMap::new(),
        }
    }
}

impl<'de> Deserialize<'de> for ErrorRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "expected a JSON object or string, got {}",
                json_type_name(&value)
            ))
        })
    }
}

/// Returns `true` for the JSON value types admitted as extra fields.
pub(crate) const fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn coerce_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_fills_defaults() {
        let record = ErrorRecord::from_value(&json!({})).unwrap();
        assert_eq!(record.name, "Error");
        assert_eq!(record.message, UNKNOWN_MESSAGE);
        assert!(record.code.is_none());
        assert!(record.cause.is_none());
    }

    #[test]
    fn test_bare_string_becomes_message() {
        let record = ErrorRecord::from_value(&json!("it broke")).unwrap();
        assert_eq!(record.name, "Error");
        assert_eq!(record.message, "it broke");
    }

    #[test]
    fn test_non_record_values_rejected() {
        assert!(ErrorRecord::from_value(&json!(42)).is_none());
        assert!(ErrorRecord::from_value(&json!([1, 2])).is_none());
        assert!(ErrorRecord::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_legacy_type_discriminator() {
        let record = ErrorRecord::from_value(&json!({"type": "TypeError", "message": "m"})).unwrap();
        assert_eq!(record.name, "TypeError");

        // `name` wins over `type` when both are present.
        let record =
            ErrorRecord::from_value(&json!({"type": "TypeError", "name": "RangeError"})).unwrap();
        assert_eq!(record.name, "RangeError");
    }

    #[test]
    fn test_code_kept_only_when_string_or_integer() {
        let record = ErrorRecord::from_value(&json!({"code": "E1"})).unwrap();
        assert_eq!(record.code, Some(Code::Str("E1".to_owned())));

        let record = ErrorRecord::from_value(&json!({"code": 404})).unwrap();
        assert_eq!(record.code, Some(Code::Int(404)));

        let record = ErrorRecord::from_value(&json!({"code": true})).unwrap();
        assert!(record.code.is_none());

        let record = ErrorRecord::from_value(&json!({"code": 1.5})).unwrap();
        assert!(record.code.is_none());
    }

    #[test]
    fn test_stack_kept_only_when_string() {
        let record = ErrorRecord::from_value(&json!({"stack": ["frame"]})).unwrap();
        assert!(record.stack.is_none());

        let record = ErrorRecord::from_value(&json!({"stack": "at main"})).unwrap();
        assert_eq!(record.stack.as_deref(), Some("at main"));
    }

    #[test]
    fn test_message_coercion() {
        let record = ErrorRecord::from_value(&json!({"message": 42})).unwrap();
        assert_eq!(record.message, "42");

        let record = ErrorRecord::from_value(&json!({"message": {"nested": true}})).unwrap();
        assert_eq!(record.message, UNKNOWN_MESSAGE);
    }

    #[test]
    fn test_nested_cause() {
        let record = ErrorRecord::from_value(&json!({
            "name": "Error",
            "message": "outer",
            "cause": {"name": "TypeError", "message": "inner"}
        }))
        .unwrap();
        let cause = record.cause.unwrap();
        assert_eq!(cause.name, "TypeError");
        assert_eq!(cause.message, "inner");
    }

    #[test]
    fn test_cause_depth_is_bounded() {
        let mut value = json!({"message": "leaf"});
        for _ in 0..(MAX_CAUSE_DEPTH * 2) {
            value = json!({"message": "link", "cause": value});
        }
        let record = ErrorRecord::from_value(&value).unwrap();

        let mut depth = 0;
        let mut node = &record;
        while let Some(cause) = node.cause.as_deref() {
            depth += 1;
            node = cause;
        }
        assert_eq!(depth, MAX_CAUSE_DEPTH);
    }

    #[test]
    fn test_malformed_aggregate_entries_skipped() {
        let record = ErrorRecord::from_value(&json!({
            "name": "AggregateError",
            "errors": [{"message": "a"}, 42, "not a record", {"message": "b"}]
        }))
        .unwrap();
        let errors = record.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "a");
        assert_eq!(errors[1].message, "b");
    }

    #[test]
    fn test_extra_fields_primitive_only() {
        let record = ErrorRecord::from_value(&json!({
            "message": "m",
            "requestId": "abc-123",
            "attempt": 3,
            "transient": true,
            "payload": {"dropped": true},
            "tags": ["dropped"]
        }))
        .unwrap();
        assert_eq!(record.extra.len(), 3);
        assert_eq!(record.extra["requestId"], json!("abc-123"));
        assert_eq!(record.extra["attempt"], json!(3));
        assert_eq!(record.extra["transient"], json!(true));
    }

    #[test]
    fn test_status_fields() {
        let record = ErrorRecord::from_value(&json!({
            "name": "HTTPRequestError",
            "statusCode": 404,
            "statusMessage": "Not Found"
        }))
        .unwrap();
        assert_eq!(record.status_code, Some(404));
        assert_eq!(record.status_message.as_deref(), Some("Not Found"));

        // Out-of-range or non-integer codes are dropped.
        let record = ErrorRecord::from_value(&json!({"statusCode": 100_000})).unwrap();
        assert!(record.status_code.is_none());
        let record = ErrorRecord::from_value(&json!({"statusCode": "500"})).unwrap();
        assert!(record.status_code.is_none());
    }

    #[test]
    fn test_serialized_shape_uses_wire_names() {
        let mut record = ErrorRecord::new("HTTPResponseError", "[500] Internal Server Error");
        record.status_code = Some(500);
        record.status_message = Some("Internal Server Error".to_owned());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "HTTPResponseError",
                "message": "[500] Internal Server Error",
                "statusCode": 500,
                "statusMessage": "Internal Server Error"
            })
        );
    }

    #[test]
    fn test_deserialize_trait_rejects_non_records() {
        let err = serde_json::from_str::<ErrorRecord>("42").unwrap_err();
        assert!(err.to_string().contains("expected a JSON object or string"));
    }
}
