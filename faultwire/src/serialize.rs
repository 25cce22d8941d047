//! Error-to-record conversion.
//!
//! [`serialize`] turns any [`std::error::Error`] into an [`ErrorRecord`].
//! A [`Fault`] converts through its own kind-aware path; foreign error
//! types fall back to generic extraction (message from `Display`, cause
//! chain from `source()`). The conversion is pure: it never mutates its
//! input and never fails.
//!
//! Types that want to control their own serialized shape implement
//! [`AsRecord`], the extensibility hook the deserializer's registry is
//! the mirror of.

use std::error::Error as StdError;

use serde::{Serialize, Serializer};

use crate::fault::{Fault, FaultKind};
use crate::record::{ErrorRecord, MAX_CAUSE_DEPTH, RESERVED_FIELDS, is_primitive};

/// Conversion into a transport record.
///
/// Implemented by [`Fault`] and by any application type that wants its
/// own serialized shape picked up instead of the generic extraction.
pub trait AsRecord {
    /// Builds the transport record for this error.
    fn as_record(&self) -> ErrorRecord;
}

impl AsRecord for Fault {
    fn as_record(&self) -> ErrorRecord {
        record_at(self, 0)
    }
}

/// Serializes an error into a transport record.
///
/// A [`Fault`] keeps its full kind-specific shape; any other error type
/// is extracted generically with `name = "Error"`, the `Display` output
/// as message, and the `source()` chain as nested causes. Faults buried
/// inside a foreign chain are still recognized.
#[must_use]
pub fn serialize(error: &(dyn StdError + 'static)) -> ErrorRecord {
    error
        .downcast_ref::<Fault>()
        .map_or_else(|| foreign_at(error, 0), |fault| fault.as_record())
}

fn record_at(fault: &Fault, depth: usize) -> ErrorRecord {
    let mut record = ErrorRecord::new(fault.name(), fault.message());
    record.code = fault.code.clone();
    record.stack = fault.stack.clone();

    if depth < MAX_CAUSE_DEPTH {
        record.cause = fault
            .cause()
            .map(|cause| Box::new(record_at(cause, depth + 1)));
    } else if fault.cause().is_some() {
        #[cfg(feature = "telemetry")]
        tracing::debug!(depth, "cause chain exceeds depth bound, truncating");
    }

    match &fault.kind {
        FaultKind::Aggregate { errors } => {
            record.errors = Some(
                errors
                    .iter()
                    .map(|error| record_at(error, depth + 1))
                    .collect(),
            );
        }
        FaultKind::Assertion {
            actual,
            expected,
            operator,
        } => {
            record.actual = actual.clone();
            record.expected = expected.clone();
            record.operator = operator.clone();
        }
        FaultKind::HttpRequest {
            status_code,
            status_message,
        }
        | FaultKind::HttpResponse {
            status_code,
            status_message,
        } => {
            record.status_code = Some(*status_code);
            record.status_message = Some(status_message.clone());
        }
        _ => {}
    }

    for (key, value) in fault.extra() {
        if is_primitive(value) && !RESERVED_FIELDS.contains(&key.as_str()) {
            record.extra.insert(key.clone(), value.clone());
        } else {
            #[cfg(feature = "telemetry")]
            tracing::trace!(field = %key, "dropping non-primitive or reserved extra field");
        }
    }

    record
}

fn foreign_at(error: &(dyn StdError + 'static), depth: usize) -> ErrorRecord {
    let mut record = ErrorRecord::new("Error", error.to_string());
    if depth < MAX_CAUSE_DEPTH {
        record.cause = error.source().map(|source| {
            Box::new(
                source
                    .downcast_ref::<Fault>()
                    .map_or_else(|| foreign_at(source, depth + 1), |fault| {
                        record_at(fault, depth + 1)
                    }),
            )
        });
    }
    record
}

impl Serialize for Fault {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_record().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection reset")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("socket closed")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    impl StdError for Inner {}

    #[test]
    fn test_fault_serializes_with_kind_fields() {
        let fault = Fault::type_error("bad input").with_code("E1");
        let record = serialize(&fault);
        assert_eq!(record.name, "TypeError");
        assert_eq!(record.message, "bad input");
        assert_eq!(record.code.as_ref().and_then(crate::Code::as_str), Some("E1"));
    }

    #[test]
    fn test_foreign_error_extracted_generically() {
        let record = serialize(&Outer(Inner));
        assert_eq!(record.name, "Error");
        assert_eq!(record.message, "connection reset");
        let cause = record.cause.unwrap();
        assert_eq!(cause.message, "socket closed");
        assert!(cause.cause.is_none());
    }

    #[test]
    fn test_aggregate_preserves_order() {
        let fault = Fault::aggregate(
            vec![
                Fault::error("first"),
                Fault::type_error("second"),
                Fault::error("third"),
            ],
            "several things failed",
        );
        let record = serialize(&fault);
        let errors = record.errors.unwrap();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(errors[1].name, "TypeError");
    }

    #[test]
    fn test_assertion_detail_carried() {
        let fault = Fault::new(
            FaultKind::Assertion {
                actual: Some(json!(2)),
                expected: Some(json!(3)),
                operator: Some("==".to_owned()),
            },
            "2 == 3",
        );
        let record = serialize(&fault);
        assert_eq!(record.actual, Some(json!(2)));
        assert_eq!(record.expected, Some(json!(3)));
        assert_eq!(record.operator.as_deref(), Some("=="));
    }

    #[test]
    fn test_extra_fields_filtered() {
        let fault = Fault::error("m")
            .with_field("requestId", json!("abc"))
            .with_field("payload", json!({"nested": true}))
            .with_field("name", json!("Sneaky"));
        let record = serialize(&fault);
        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.extra["requestId"], json!("abc"));
        assert_eq!(record.name, "Error");
    }

    #[test]
    fn test_cause_serialization_is_depth_bounded() {
        let mut fault = Fault::error("leaf");
        for i in 0..(MAX_CAUSE_DEPTH * 2) {
            fault = Fault::error(format!("link {i}")).with_cause(fault);
        }
        let record = serialize(&fault);

        let mut depth = 0;
        let mut node = &record;
        while let Some(cause) = node.cause.as_deref() {
            depth += 1;
            node = cause;
        }
        assert_eq!(depth, MAX_CAUSE_DEPTH);
    }

    #[test]
    fn test_serde_serialize_impl_matches_record() {
        let fault = Fault::syntax_error("unexpected token").with_code(7i64);
        let via_impl = serde_json::to_value(&fault).unwrap();
        let via_record = serde_json::to_value(serialize(&fault)).unwrap();
        assert_eq!(via_impl, via_record);
        assert_eq!(via_impl["name"], json!("SyntaxError"));
        assert_eq!(via_impl["code"], json!(7));
    }
}
