//! Client-side HTTP response fault.

use std::error::Error as StdError;
use std::fmt;

use faultwire::{AsRecord, Code, ErrorRecord, Fault, FaultKind, status};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::parts::FaultParts;

/// An error that occurred on the client because of a faulty server
/// response.
///
/// The twin of [`RequestFault`](crate::RequestFault), distinguished by
/// name and by carrying the triggering response as its companion. Same
/// immutability and serialization contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFault {
    inner: Fault,
    response: Option<Value>,
}

impl ResponseFault {
    /// Constructs a response fault from any accepted option shape.
    ///
    /// See [`FaultParts`] for the recognized shapes and the resolution
    /// precedence. Never fails.
    #[must_use]
    pub fn new(parts: impl Into<FaultParts>) -> Self {
        let resolved = parts.into().resolve();
        let mut inner = Fault::http_response(resolved.status_code, resolved.status_text);
        if let Some(cause) = resolved.cause {
            inner = inner.with_cause(cause);
        }
        Self {
            inner,
            response: resolved.companion,
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

    /// The companion response, if one was attached.
    #[must_use]
    pub const fn response(&self) -> Option<&Value> {
        self.response.as_ref()
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

impl Default for ResponseFault {
    fn default() -> Self {
        Self::new(FaultParts::new())
    }
}

impl fmt::Display for ResponseFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for ResponseFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        StdError::source(&self.inner)
    }
}

impl From<ResponseFault> for Fault {
    fn from(fault: ResponseFault) -> Self {
        fault.into_fault()
    }
}

impl TryFrom<Fault> for ResponseFault {
    type Error = Fault;

    /// Wraps a core fault of the `HTTPResponseError` kind; any other kind
    /// is handed back unchanged.
    fn try_from(fault: Fault) -> Result<Self, Fault> {
        match fault.kind() {
            FaultKind::HttpResponse { .. } => Ok(Self {
                inner: fault,
                response: None,
            }),
            _ => Err(fault),
        }
    }
}

impl AsRecord for ResponseFault {
    fn as_record(&self) -> ErrorRecord {
        self.inner.as_record()
    }
}

impl Serialize for ResponseFault {
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
    use faultwire::{deserialize, parse};
    use serde_json::json;

    #[test]
    fn test_no_arguments_yields_500_defaults() {
        let fault = ResponseFault::default();
        assert_eq!(fault.status_code(), 500);
        assert_eq!(fault.status_text(), "Internal Server Error");
        assert_eq!(fault.code(), "ERR_HTTP_STATUS_500");
        assert!(fault.response().is_none());
    }

    #[test]
    fn test_descriptor_construction() {
        let fault = ResponseFault::new(json!({
            "status": 502,
            "headers": {"server": "edge-7"},
            "cause": {"name": "Error", "message": "upstream refused"}
        }));
        assert_eq!(fault.status_code(), 502);
        assert_eq!(fault.status_text(), "Bad Gateway");
        assert!(fault.response().is_some());
        assert_eq!(fault.cause().map(Fault::message), Some("upstream refused"));
    }

    #[test]
    fn test_wire_round_trip_through_text() {
        let original = ResponseFault::new((503u16, "Service Unavailable"));
        let text = serde_json::to_string(&original).unwrap();
        let revived = parse(&text).unwrap();
        assert_eq!(revived.name(), "HTTPResponseError");
        assert_eq!(revived.http_status(), Some((503, "Service Unavailable")));
    }

    #[test]
    fn test_kinds_do_not_cross() {
        let request_kind = deserialize(&ErrorRecord::new("HTTPRequestError", "m"));
        assert!(ResponseFault::try_from(request_kind).is_err());
    }
}
