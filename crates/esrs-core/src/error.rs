//! # Error Types: Core Value Errors
//!
//! Errors raised while constructing the leaf value types of the workspace:
//! qualified names, reporting entities, periods, and timestamps. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Constructors reject malformed input; there is no silent normalization
//!   that could make two different inputs produce the same value.
//! - Every variant carries the offending input so that a caller can report
//!   it without re-deriving context.

use chrono::NaiveDate;
use thiserror::Error;

/// Error constructing a core value type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A qualified name was not of the form `prefix:local`.
    #[error("malformed qualified name {0:?}: expected `prefix:local`")]
    MalformedQName(String),

    /// A qualified name used a prefix outside the fixed namespace table.
    #[error("unknown namespace prefix {prefix:?} in {qname:?}")]
    UnknownPrefix {
        /// The unrecognised prefix.
        prefix: String,
        /// The full qualified name as given.
        qname: String,
    },

    /// A Legal Entity Identifier failed format or checksum validation.
    #[error("invalid LEI {code:?}: {reason}")]
    InvalidLei {
        /// The identifier as given.
        code: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An entity identifier or scheme was empty.
    #[error("reporting entity {field} must not be empty")]
    EmptyEntityField {
        /// Which field was empty (`identifier` or `scheme`).
        field: &'static str,
    },

    /// A duration period ended before it started.
    #[error("invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// Period start date.
        start: NaiveDate,
        /// Period end date.
        end: NaiveDate,
    },

    /// A timestamp was not valid RFC 3339 or was not in UTC.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The input string.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be decimal strings or integers.
    #[error("float values are not permitted in canonical representations; use a decimal string: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
