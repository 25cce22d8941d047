#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP request/response error variants for `faultwire`.
//!
//! Two structurally identical variants over the core taxonomy,
//! distinguished by name and by which opaque companion object they carry:
//!
//! - [`RequestFault`] (`HTTPRequestError`) — raised on the server while
//!   processing an incoming request; carries the request.
//! - [`ResponseFault`] (`HTTPResponseError`) — raised on the client
//!   because of a faulty response; carries the response.
//!
//! Both are immutable after construction and resolve their status pair
//! against the status-text table (unknown or absent codes default to
//! `500`). Construction goes through [`FaultParts`], a configuration
//! object with a single documented precedence; the legacy positional
//! shapes survive as `From` shims.
//!
//! Companions never cross a serialization boundary: converting to the
//! core [`Fault`](faultwire::Fault) or serializing with serde drops them,
//! while the status pair rides in the transport record's
//! `statusCode`/`statusMessage` fields and round-trips losslessly.

pub mod parts;
pub mod request;
pub mod response;

pub use parts::FaultParts;
pub use request::RequestFault;
pub use response::ResponseFault;
