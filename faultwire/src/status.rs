//! HTTP status code lookup and resolution.
//!
//! Thin wrapper over the [`http`] crate's canonical reason phrases. The
//! HTTP error variants resolve their `(status code, status text)` pair
//! through [`resolve_status`], which applies the protocol defaults: an
//! unknown or absent code falls back to `500`, an absent text falls back
//! to the table entry for the resolved code.

use http::StatusCode;

/// Status code assumed when none (or an unknown one) is supplied.
pub const DEFAULT_STATUS: u16 = 500;

/// Looks up the canonical reason phrase for a status code.
///
/// Returns `None` for codes outside the registered set.
#[must_use]
pub fn status_text(code: u16) -> Option<&'static str> {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
}

/// Returns `true` if the code has an entry in the status-text table.
#[must_use]
pub fn is_known_status(code: u16) -> bool {
    status_text(code).is_some()
}

/// Resolves a `(status code, status text)` pair from optional inputs.
///
/// The code is kept only when it is a known table entry, otherwise
/// [`DEFAULT_STATUS`]; the text defaults to the table entry for the
/// resolved code. Never fails.
#[must_use]
pub fn resolve_status(code: Option<u16>, text: Option<&str>) -> (u16, String) {
    let resolved = match code {
        Some(candidate) if is_known_status(candidate) => candidate,
        Some(_candidate) => {
            #[cfg(feature = "telemetry")]
            tracing::debug!(code = _candidate, "unknown status code, defaulting to 500");
            DEFAULT_STATUS
        }
        None => DEFAULT_STATUS,
    };
    let text = match text {
        Some(given) => given.to_owned(),
        None => status_text(resolved).unwrap_or("Unknown Status").to_owned(),
    };
    (resolved, text)
}

/// Machine-readable code derived from a status code.
#[must_use]
pub fn machine_code(status: u16) -> String {
    format!("ERR_HTTP_STATUS_{status}")
}
