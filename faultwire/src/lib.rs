#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Portable error serialization across process and network boundaries.
//!
//! This crate converts in-memory failure objects into a plain,
//! JSON-compatible transport record and reconstructs equivalent failures
//! from that record on the receiving side. The record is the single
//! contract between both sides, so it stays stable even when the live
//! error implementations differ between sender and receiver.
//!
//! # Overview
//!
//! Data flows live error → [`serialize`](fn@serialize) → [`ErrorRecord`]
//! → (optional [`stringify`]) → wire/storage → (optional [`parse`]) →
//! [`deserialize`] → live error. Nested causality chains and aggregated sub-errors are
//! carried recursively; kinds the taxonomy does not know about degrade to
//! generic errors without losing their name, code, or primitive fields.
//!
//! Everything is synchronous and pure: the only process-wide state is the
//! frozen [`default_registry`], assembled once at first use.
//!
//! # Modules
//!
//! - [`record`] - The transport record and its tolerant JSON reader
//! - [`fault`] - The live error type and the variant taxonomy
//! - [`serialize`](mod@serialize) - Error-to-record conversion
//! - [`revive`] - Record-to-error reconstruction and the variant registry
//! - [`encoding`] - Textual encode/decode wrappers, the only throwing surface
//! - [`class`] - Constructor factory for application-defined kinds
//! - [`status`] - HTTP status-text lookup used by the HTTP error variants
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing events at the degradation points
//!   (unknown kinds, dropped fields, truncated chains)

pub mod class;
pub mod encoding;
pub mod fault;
pub mod record;
pub mod revive;
pub mod serialize;
pub mod status;

pub use class::FaultClass;
pub use encoding::{CodecError, parse, parse_with, stringify};
pub use fault::{Fault, FaultKind};
pub use record::{Code, ErrorRecord, MAX_CAUSE_DEPTH, UNKNOWN_MESSAGE};
pub use revive::{VariantRegistry, default_registry, deserialize};
pub use serialize::{AsRecord, serialize};
