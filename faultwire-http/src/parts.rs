//! Configuration object for constructing HTTP faults.
//!
//! [`FaultParts`] enumerates the recognized construction options with a
//! single documented precedence, replacing positional argument sniffing.
//! The legacy call shapes survive as thin `From` shims, so the common
//! ways of raising an HTTP error stay one expression:
//!
//! ```
//! use faultwire_http::RequestFault;
//!
//! let not_found = RequestFault::new(404u16);
//! let teapot = RequestFault::new((418u16, "short and stout"));
//! assert_eq!(not_found.status_text(), "Not Found");
//! assert_eq!(teapot.status_text(), "short and stout");
//! ```

use faultwire::record::ErrorRecord;
use faultwire::{Fault, deserialize, status};
use serde_json::Value;

/// Construction options for an HTTP fault.
///
/// Resolution policy, applied once at construction:
///
/// - `status_code` is kept only when it is a known status-table entry,
///   otherwise `500`;
/// - `status_text` defaults to the table text for the resolved code;
/// - `companion` is kept only when it exposes a `headers` member;
/// - `cause` is chained as-is.
#[derive(Debug, Clone, Default)]
pub struct FaultParts {
    /// Requested status code.
    pub status_code: Option<u16>,
    /// Requested status text.
    pub status_text: Option<String>,
    /// Candidate companion object (the triggering request or response).
    pub companion: Option<Value>,
    /// The failure that triggered this one.
    pub cause: Option<Fault>,
}

impl FaultParts {
    /// Creates an empty option set; resolution yields the `500` defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method: sets the status code.
    #[must_use]
    pub const fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Builder-style method: sets the status text.
    #[must_use]
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    /// Builder-style method: sets the companion candidate.
    #[must_use]
    pub fn with_companion(mut self, companion: Value) -> Self {
        self.companion = Some(companion);
        self
    }

    /// Builder-style method: sets the cause.
    #[must_use]
    pub fn with_cause(mut self, cause: Fault) -> Self {
        self.cause = Some(cause);
        self
    }

    pub(crate) fn resolve(self) -> Resolved {
        let (status_code, status_text) =
            status::resolve_status(self.status_code, self.status_text.as_deref());
        let companion = self.companion.filter(has_headers);
        Resolved {
            status_code,
            status_text,
            companion,
            cause: self.cause,
        }
    }
}

pub(crate) struct Resolved {
    pub(crate) status_code: u16,
    pub(crate) status_text: String,
    pub(crate) companion: Option<Value>,
    pub(crate) cause: Option<Fault>,
}

/// A companion object is recognized by the presence of a `headers` member.
fn has_headers(value: &Value) -> bool {
    value.get("headers").is_some()
}

impl From<u16> for FaultParts {
    fn from(status_code: u16) -> Self {
        Self::new().with_status_code(status_code)
    }
}

impl From<(u16, &str)> for FaultParts {
    fn from((status_code, status_text): (u16, &str)) -> Self {
        Self::new()
            .with_status_code(status_code)
            .with_status_text(status_text)
    }
}

impl From<(u16, String)> for FaultParts {
    fn from((status_code, status_text): (u16, String)) -> Self {
        Self::new()
            .with_status_code(status_code)
            .with_status_text(status_text)
    }
}

impl From<&str> for FaultParts {
    /// Legacy message shape: a bare string is the status text, with the
    /// default status code.
    fn from(status_text: &str) -> Self {
        Self::new().with_status_text(status_text)
    }
}

impl From<String> for FaultParts {
    fn from(status_text: String) -> Self {
        Self::new().with_status_text(status_text)
    }
}

impl From<&Value> for FaultParts {
    /// Legacy descriptor shape: an object carrying any of
    /// `status`/`statusCode`, `statusText`/`statusMessage`, `headers`
    /// (making the descriptor itself the companion), and `cause`
    /// (a nested transport record).
    fn from(descriptor: &Value) -> Self {
        let status_code = descriptor
            .get("status")
            .and_then(Value::as_u64)
            .or_else(|| descriptor.get("statusCode").and_then(Value::as_u64))
            .and_then(|code| u16::try_from(code).ok());
        let status_text = descriptor
            .get("statusText")
            .and_then(Value::as_str)
            .or_else(|| descriptor.get("statusMessage").and_then(Value::as_str))
            .map(str::to_owned);
        let companion = descriptor
            .get("headers")
            .is_some()
            .then(|| descriptor.clone());
        let cause = descriptor
            .get("cause")
            .and_then(ErrorRecord::from_value)
            .map(|record| deserialize(&record));
        Self {
            status_code,
            status_text,
            companion,
            cause,
        }
    }
}

impl From<Value> for FaultParts {
    fn from(descriptor: Value) -> Self {
        Self::from(&descriptor)
    }
}
