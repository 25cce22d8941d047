//! Record-to-error reconstruction and the variant registry.
//!
//! [`VariantRegistry`] is the kind→reviver dispatch table: it maps a
//! record's `name` discriminator to the function that reconstructs a live
//! [`Fault`] of that kind. A registry is assembled once: the built-in
//! table covers the fixed taxonomy, and applications extend it with
//! [`VariantRegistry::with_variant`]. The process-wide default is frozen
//! behind [`default_registry`].
//!
//! Reconstruction is best-effort over untrusted input: malformed or
//! missing fields degrade to defaults, unknown kinds fall back to the
//! generic path, and nothing here ever fails.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer};

use crate::fault::{Fault, FaultKind};
use crate::record::{ErrorRecord, is_primitive};
use crate::status;

type Reviver = Box<dyn Fn(&ErrorRecord, &VariantRegistry) -> Fault + Send + Sync>;

/// Dispatch table from kind discriminator to reconstruction function.
///
/// ```
/// use faultwire::{ErrorRecord, Fault, VariantRegistry};
///
/// let registry = VariantRegistry::builtin()
///     .with_variant("DatabaseError", |record, _| {
///         Fault::named("DatabaseError", record.message.clone())
///     });
/// let fault = registry.revive(&ErrorRecord::new("DatabaseError", "deadlock"));
/// assert_eq!(fault.name(), "DatabaseError");
/// ```
pub struct VariantRegistry {
    revivers: HashMap<String, Reviver>,
}

impl Debug for VariantRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.revivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_tuple("VariantRegistry").field(&names).finish()
    }
}

impl VariantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            revivers: HashMap::new(),
        }
    }

    /// Creates a registry pre-populated with the fixed taxonomy:
    /// `Error`, `TypeError`, `RangeError`, `ReferenceError`, `SyntaxError`,
    /// `AssertionError`, `AggregateError`, `HTTPRequestError`,
    /// `HTTPResponseError`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with_variant("Error", revive_generic)
            .with_variant("TypeError", revive_type)
            .with_variant("RangeError", revive_range)
            .with_variant("ReferenceError", revive_reference)
            .with_variant("SyntaxError", revive_syntax)
            .with_variant("AssertionError", revive_assertion)
            .with_variant("AggregateError", revive_aggregate)
            .with_variant("HTTPRequestError", revive_http_request)
            .with_variant("HTTPResponseError", revive_http_response)
    }

    /// Builder-style method: registers a reviver for a kind name.
    ///
    /// The reviver only constructs the kind-specific shape; the common
    /// post pass (`code`/`stack`/`cause`/extra fields) is applied by
    /// [`revive`](Self::revive) for every kind uniformly.
    #[must_use]
    pub fn with_variant<F>(mut self, name: impl Into<String>, reviver: F) -> Self
    where
        F: Fn(&ErrorRecord, &VariantRegistry) -> Fault + Send + Sync + 'static,
    {
        self.revivers.insert(name.into(), Box::new(reviver));
        self
    }

    /// Returns `true` if a reviver is registered for the kind name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.revivers.contains_key(name)
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revivers.len()
    }

    /// Returns `true` if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revivers.is_empty()
    }

    /// Reconstructs a live fault from a transport record.
    ///
    /// Dispatches on `record.name`; an unknown kind falls back to the
    /// generic path, preserving the name. After construction, fields the
    /// kind constructor did not compute are filled from the record
    /// (first-write-wins), a missing stack is replaced by a freshly
    /// captured trace rooted here, and primitive extra fields are copied
    /// through. Never fails.
    #[must_use]
    pub fn revive(&self, record: &ErrorRecord) -> Fault {
        let mut fault = match self.revivers.get(record.name.as_str()) {
            Some(reviver) => reviver(record, self),
            None => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(kind = %record.name, "unknown error kind, reviving as generic");
                revive_generic(record, self)
            }
        };

        if fault.code.is_none() {
            fault.code = record.code.clone();
        }
        if fault.stack.is_none() {
            fault.stack = record.stack.clone().or_else(captured_stack);
        }
        if fault.cause.is_none() {
            fault.cause = record
                .cause
                .as_deref()
                .map(|cause| Box::new(self.revive(cause)));
        }
        for (key, value) in &record.extra {
            if is_primitive(value) && !fault.extra.contains_key(key) {
                fault.extra.insert(key.clone(), value.clone());
            }
        }
        fault
    }
}

impl Default for VariantRegistry {
    /// The built-in taxonomy, not an empty table.
    fn default() -> Self {
        Self::builtin()
    }
}

static DEFAULT_REGISTRY: LazyLock<VariantRegistry> = LazyLock::new(VariantRegistry::builtin);

/// The process-wide registry holding the fixed taxonomy.
///
/// Assembled once on first use and never mutated afterwards. Applications
/// that register custom kinds build their own [`VariantRegistry`] instead.
#[must_use]
pub fn default_registry() -> &'static VariantRegistry {
    &DEFAULT_REGISTRY
}

/// Reconstructs a live fault from a transport record using the
/// process-wide registry.
///
/// See [`VariantRegistry::revive`] for the reconstruction contract.
#[must_use]
pub fn deserialize(record: &ErrorRecord) -> Fault {
    default_registry().revive(record)
}

fn revive_generic(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    Fault::named(record.name.clone(), record.message.clone())
}

fn revive_type(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    Fault::type_error(record.message.clone())
}

fn revive_range(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    Fault::range_error(record.message.clone())
}

fn revive_reference(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    Fault::reference_error(record.message.clone())
}

fn revive_syntax(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    Fault::syntax_error(record.message.clone())
}

fn revive_assertion(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    Fault::new(
        FaultKind::Assertion {
            actual: record.actual.clone(),
            expected: record.expected.clone(),
            operator: record.operator.clone(),
        },
        record.message.clone(),
    )
}

fn revive_aggregate(record: &ErrorRecord, registry: &VariantRegistry) -> Fault {
    let errors = record
        .errors
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|entry| registry.revive(entry))
        .collect();
    Fault::aggregate(errors, record.message.clone())
}

fn revive_http_request(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    let (code, text) = status::resolve_status(record.status_code, record.status_message.as_deref());
    Fault::http_request(code, text)
}

fn revive_http_response(record: &ErrorRecord, _registry: &VariantRegistry) -> Fault {
    let (code, text) = status::resolve_status(record.status_code, record.status_message.as_deref());
    Fault::http_response(code, text)
}

fn captured_stack() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Fault {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = ErrorRecord::deserialize(deserializer)?;
        Ok(deserialize(&record))
    }
}
