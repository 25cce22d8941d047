//! Server-side HTTP request fault.

use std::error::Error as StdError;
use std::fmt;

use faultwire::{AsRecord, Code, ErrorRecord, Fault, FaultKind, status};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::parts::FaultParts;

/// An error that occurred on the server while processing an incoming
/// request.
///
/// Instances are immutable after construction: every field is reachable
/// only through getters, so the status pair, code, and companion cannot
/// be reassigned. The companion request never crosses a serialization
/// boundary: [`fault`](Self::fault)/[`into_fault`](Self::into_fault) and
/// the [`Serialize`] impl all drop it.
///
/// ```
/// use faultwire_http::RequestFault;
///
/// let fault = RequestFault::default();
/// assert_eq!(fault.status_code(), 500);
/// assert_eq!(fault.code(), "ERR_HTTP_STATUS_500");
/// assert_eq!(fault.message(), "[500] Internal Server Error");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFault {
    inner: Fault,
    request: Option<Value>,
}

impl RequestFault {
    /// Constructs a request fault from any accepted option shape.
    ///
    /// Accepts [`FaultParts`] or any of its legacy `From` shims (a status
    /// code, a `(code, text)` pair, a message string, a descriptor
    /// object). Resolution never fails; see [`FaultParts`] for the
    /// precedence.
    #[must_use]
    pub fn new(parts: impl Into<FaultParts>) -> Self {
        let resolved = parts.into().resolve();
        let mut inner = Fault::http_request(resolved.status_code, resolved.status_text);
        if let Some(cause) = resolved.cause {
            inner = inner.with_cause(cause);
        }
        Self {
            inner,
            request: resolved.companion,
        }
    }

    /// The resolved status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.inner
            .http_status()
            .map_or(status::DEFAULT_STATUS, |(code, _)| code)
    }

    /// Duplicate accessor for [`status_code`](Self::status_code).
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status_code()
    }

    /// The resolved status text.
    #[must_use]
    pub fn status_text(&self) -> &str {
        self.inner.http_status().map_or("", |(_, text)| text)
    }

    /// Duplicate accessor for [`status_text`](Self::status_text).
    #[must_use]
    pub fn status_message(&self) -> &str {
        self.status_text()
    }

    /// The machine code, always `"ERR_HTTP_STATUS_<code>"`.
    #[must_use]
    pub fn code(&self) -> &str {
        self.inner.code().and_then(Code::as_str).unwrap_or_default()
    }

    /// The message, always `"[<code>] <text>"`.
    #[must_use]
    pub fn message(&self) -> &str {
        self.inner.message()
    }

    /// The companion request, if one was attached.
    #[must_use]
    pub const fn request(&self) -> Option<&Value> {
        self.request.as_ref()
    }

    /// The failure that triggered this one, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&Fault> {
        self.inner.cause()
    }

    /// A view of this fault as the core taxonomy type.
    #[must_use]
    pub const fn fault(&self) -> &Fault {
        &self.inner
    }

    /// Converts into the core taxonomy type, dropping the companion.
    #[must_use]
    pub fn into_fault(self) -> Fault {
        self.inner
    }
}

impl Default for RequestFault {
    fn default() -> Self {
        Self::new(FaultParts::new())
    }
}

impl fmt::Display for RequestFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for RequestFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        StdError::source(&self.inner)
    }
}

impl From<RequestFault> for Fault {
    fn from(fault: RequestFault) -> Self {
        fault.into_fault()
    }
}

impl TryFrom<Fault> for RequestFault {
    type Error = Fault;

    /// Wraps a core fault of the `HTTPRequestError` kind; any other kind
    /// is handed back unchanged.
    fn try_from(fault: Fault) -> Result<Self, Fault> {
        match fault.kind() {
            FaultKind::HttpRequest { .. } => Ok(Self {
                inner: fault,
                request: None,
            }),
            _ => Err(fault),
        }
    }
}

impl AsRecord for RequestFault {
    fn as_record(&self) -> ErrorRecord {
        self.inner.as_record()
    }
}

impl Serialize for RequestFault {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultwire::deserialize;
    use serde_json::json;

    #[test]
    fn test_no_arguments_yields_500_defaults() {
        let fault = RequestFault::default();
        assert_eq!(fault.status_code(), 500);
        assert_eq!(fault.status(), 500);
        assert_eq!(fault.status_text(), "Internal Server Error");
        assert_eq!(fault.status_message(), "Internal Server Error");
        assert_eq!(fault.code(), "ERR_HTTP_STATUS_500");
        assert_eq!(fault.message(), "[500] Internal Server Error");
        assert!(fault.request().is_none());
    }

    #[test]
    fn test_explicit_status_pair() {
        let fault = RequestFault::new((404u16, "Not Found"));
        assert_eq!(fault.status_code(), 404);
        assert_eq!(fault.code(), "ERR_HTTP_STATUS_404");
        assert_eq!(fault.message(), "[404] Not Found");
    }

    #[test]
    fn test_companion_and_cause_attached() {
        let fault = RequestFault::new(
            FaultParts::new()
                .with_status_code(400)
                .with_companion(json!({"headers": {"host": "example.test"}, "method": "POST"}))
                .with_cause(Fault::syntax_error("unreadable body")),
        );
        assert_eq!(fault.request().and_then(|r| r.get("method")), Some(&json!("POST")));
        assert_eq!(fault.cause().map(Fault::name), Some("SyntaxError"));

        let source = StdError::source(&fault).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("unreadable body"));
    }

    #[test]
    fn test_serialization_drops_companion() {
        let fault = RequestFault::new(
            FaultParts::new()
                .with_status_code(404)
                .with_companion(json!({"headers": {}})),
        );
        let value = serde_json::to_value(&fault).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "HTTPRequestError",
                "message": "[404] Not Found",
                "code": "ERR_HTTP_STATUS_404",
                "statusCode": 404,
                "statusMessage": "Not Found"
            })
        );
    }

    #[test]
    fn test_round_trip_preserves_status_pair() {
        let original = RequestFault::new((418u16, "I'm a teapot"));
        let revived = deserialize(&original.as_record());
        assert_eq!(revived.name(), "HTTPRequestError");
        assert_eq!(revived.http_status(), Some((418, "I'm a teapot")));
        assert_eq!(revived.message(), "[418] I'm a teapot");

        let wrapped = RequestFault::try_from(revived).unwrap();
        assert_eq!(wrapped.status_code(), 418);
    }

    #[test]
    fn test_try_from_rejects_other_kinds() {
        let fault = Fault::type_error("nope");
        assert!(RequestFault::try_from(fault).is_err());
    }
}
