//! Live error type and the variant taxonomy it ranges over.
//!
//! A [`Fault`] is the in-memory failure object: it is created at the
//! failure site (raised) or by the deserializer (reconstructed from a
//! transport record). Its [`FaultKind`] is the kind discriminator the
//! serializer and deserializer dispatch on.
//!
//! Cause chains are owned: each fault holds at most one direct cause,
//! exclusively, so a chain is an acyclic singly-linked structure by
//! construction; a back-reference is unrepresentable.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use crate::record::Code;
use crate::status;

/// The recognized error kinds and their kind-specific payloads.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FaultKind {
    /// A generic error, or one with a name outside the fixed taxonomy.
    Generic {
        /// The kind discriminator carried on the wire.
        name: String,
    },
    /// A value had the wrong type.
    Type,
    /// A value was outside its permitted range.
    Range,
    /// A reference could not be resolved.
    Reference,
    /// Input could not be parsed.
    Syntax,
    /// An assertion failed.
    Assertion {
        /// The value that was produced.
        actual: Option<Value>,
        /// The value that was expected.
        expected: Option<Value>,
        /// The comparison operator.
        operator: Option<String>,
    },
    /// Several errors wrapped into one.
    Aggregate {
        /// The wrapped errors, in order.
        errors: Vec<Fault>,
    },
    /// A failure while processing an incoming HTTP request.
    HttpRequest {
        /// The resolved status code.
        status_code: u16,
        /// The resolved status text.
        status_message: String,
    },
    /// A failure caused by a faulty HTTP response.
    HttpResponse {
        /// The resolved status code.
        status_code: u16,
        /// The resolved status text.
        status_message: String,
    },
}

impl FaultKind {
    /// The kind discriminator string used on the wire.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Generic { name } => name,
            Self::Type => "TypeError",
            Self::Range => "RangeError",
            Self::Reference => "ReferenceError",
            Self::Syntax => "SyntaxError",
            Self::Assertion { .. } => "AssertionError",
            Self::Aggregate { .. } => "AggregateError",
            Self::HttpRequest { .. } => "HTTPRequestError",
            Self::HttpResponse { .. } => "HTTPResponseError",
        }
    }
}

/// An in-memory failure object.
///
/// Construct one with the kind-specific constructors and chain builder
/// methods:
///
/// ```
/// use faultwire::Fault;
///
/// let fault = Fault::type_error("bad input")
///     .with_code("E1")
///     .with_cause(Fault::error("root failure"));
/// assert_eq!(fault.name(), "TypeError");
/// assert_eq!(fault.cause().map(Fault::message), Some("root failure"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub(crate) kind: FaultKind,
    pub(crate) message: String,
    pub(crate) code: Option<Code>,
    pub(crate) stack: Option<String>,
    pub(crate) cause: Option<Box<Fault>>,
    pub(crate) extra: BTreeMap<String, Value>,
}

impl Fault {
    /// Creates a fault of the given kind.
    #[must_use]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            stack: None,
            cause: None,
            extra: BTreeMap::new(),
        }
    }

    /// Creates a plain `Error`.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::named("Error", message)
    }

    /// Creates a generic fault with an arbitrary kind name.
    #[must_use]
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FaultKind::Generic { name: name.into() }, message)
    }

    /// Creates a `TypeError`.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Type, message)
    }

    /// Creates a `RangeError`.
    #[must_use]
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Range, message)
    }

    /// Creates a `ReferenceError`.
    #[must_use]
    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Reference, message)
    }

    /// Creates a `SyntaxError`.
    #[must_use]
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Syntax, message)
    }

    /// Creates an `AssertionError` with no comparison detail.
    ///
    /// Use [`FaultKind::Assertion`] with [`Fault::new`] to attach
    /// `actual`/`expected`/`operator`.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(
            FaultKind::Assertion {
                actual: None,
                expected: None,
                operator: None,
            },
            message,
        )
    }

    /// Creates an `AggregateError` wrapping the given faults, in order.
    #[must_use]
    pub fn aggregate(errors: Vec<Fault>, message: impl Into<String>) -> Self {
        Self::new(FaultKind::Aggregate { errors }, message)
    }

    /// Creates an `HTTPRequestError` from an already-resolved status pair.
    ///
    /// The message is always `"[<code>] <text>"` and the machine code
    /// `"ERR_HTTP_STATUS_<code>"`. Callers with unvalidated input should
    /// resolve it through [`status::resolve_status`] first.
    #[must_use]
    pub fn http_request(status_code: u16, status_message: impl Into<String>) -> Self {
        let status_message = status_message.into();
        let mut fault = Self::new(
            FaultKind::HttpRequest {
                status_code,
                status_message: status_message.clone(),
            },
            format!("[{status_code}] {status_message}"),
        );
        fault.code = Some(Code::Str(status::machine_code(status_code)));
        fault
    }

    /// Creates an `HTTPResponseError` from an already-resolved status pair.
    ///
    /// Same contract as [`Fault::http_request`].
    #[must_use]
    pub fn http_response(status_code: u16, status_message: impl Into<String>) -> Self {
        let status_message = status_message.into();
        let mut fault = Self::new(
            FaultKind::HttpResponse {
                status_code,
                status_message: status_message.clone(),
            },
            format!("[{status_code}] {status_message}"),
        );
        fault.code = Some(Code::Str(status::machine_code(status_code)));
        fault
    }

    /// Attaches a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches a diagnostic trace.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attaches the failure that triggered this one.
    #[must_use]
    pub fn with_cause(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Attaches an extension field.
    ///
    /// Only primitive-valued fields survive serialization; see
    /// [`crate::serialize`].
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert_field(key, value);
        self
    }

    /// Inserts an extension field in place.
    ///
    /// This is the mutation hook used by custom-class initializers.
    pub fn insert_field(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// The variant this fault belongs to.
    #[must_use]
    pub const fn kind(&self) -> &FaultKind {
        &self.kind
    }

    /// The kind discriminator string.
    #[must_use]
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The machine-readable code, if any.
    #[must_use]
    pub const fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    /// The diagnostic trace, if any.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// The direct cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    /// The extension fields.
    #[must_use]
    pub const fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// The `(status code, status text)` pair of an HTTP variant.
    #[must_use]
    pub fn http_status(&self) -> Option<(u16, &str)> {
        match &self.kind {
            FaultKind::HttpRequest {
                status_code,
                status_message,
            }
            | FaultKind::HttpResponse {
                status_code,
                status_message,
            } => Some((*status_code, status_message)),
            _ => None,
        }
    }

    /// Iterates over the cause chain, starting at the direct cause.
    pub fn causes(&self) -> impl Iterator<Item = &Fault> {
        CauseIter {
            next: self.cause.as_deref(),
        }
    }
}

struct CauseIter<'a> {
    next: Option<&'a Fault>,
}

impl<'a> Iterator for CauseIter<'a> {
    type Item = &'a Fault;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause.as_deref();
        Some(current)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn StdError + 'static))
    }
}
