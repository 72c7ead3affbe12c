//! # Error Types
//!
//! Build-time errors abort generation: no valid document can exist when a
//! report field is unmapped or a value is outside its concept's domain.
//! Regulatory defects (missing concepts, sum mismatches) are not errors here;
//! they surface as [`crate::validate::Diagnostic`] values.

use std::path::PathBuf;

use thiserror::Error;

use esrs_core::{CanonicalizationError, ContextId, CoreError, ReportingEntity};
use esrs_taxonomy::{CatalogError, ConceptKind};

/// Interning a context or unit failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The context's entity differs from the document's single entity.
    #[error("context {context} is for entity {found}, but the document reports on {expected}")]
    MultiEntity {
        /// Id the context would have received.
        context: ContextId,
        /// The document's declared entity.
        expected: ReportingEntity,
        /// The entity that was offered.
        found: ReportingEntity,
    },
}

/// Encoding a raw value into a fact failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// The field has no concept.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The value is outside the concept kind's domain.
    #[error("{field} ({kind}): value {value:?} is out of domain: {reason}")]
    Domain {
        /// Report field name.
        field: String,
        /// Data kind of the concept.
        kind: ConceptKind,
        /// The value as given.
        value: String,
        /// Which domain rule it broke.
        reason: String,
    },

    /// The unit could not be built (e.g. a malformed currency code).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The fact's context could not be interned.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Assembling a document from a report failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Unknown field or broken catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A metric could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A header value (entity, period) is invalid.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A header-derived field was supplied as a metric.
    #[error("{field} is taken from the report header and cannot be supplied as a metric")]
    HeaderField {
        /// The offending metric key.
        field: String,
    },

    /// An exclusion was recorded without a reason.
    #[error("exclusion of {field} needs a non-empty reason")]
    EmptyExclusionReason {
        /// The excluded field.
        field: String,
    },

    /// The report currency is not a three-letter ISO 4217 code.
    #[error("invalid report currency {0:?}: expected a three-letter ISO 4217 code")]
    InvalidCurrency(String),
}

/// Serialization refused or failed.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// The document has not passed validation with zero errors, or the
    /// diagnostics were computed for a different document.
    #[error("document has not passed validation: {reason}")]
    NotValidated {
        /// Why the diagnostics do not authorize serialization.
        reason: String,
    },

    /// The document could not be fingerprinted.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The XML writer or reader failed.
    #[error("xml error: {0}")]
    Xml(String),

    /// Fact JSON could not be parsed back.
    #[error("invalid fact json: {0}")]
    FactJson(String),

    /// An extracted fact is missing a required attribute or carries a bad
    /// value.
    #[error("invalid fact element {element}: {reason}")]
    InvalidFact {
        /// Element name, e.g. `ix:nonFraction`.
        element: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Loading a generation policy failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The YAML was malformed or had unknown keys.
    #[error("invalid policy yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of range.
    #[error("invalid policy value for {field}: {reason}")]
    Invalid {
        /// Policy key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Loading a report model failed.
#[derive(Error, Debug)]
pub enum ReportError {
    /// YAML parse failure.
    #[error("invalid report yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse failure.
    #[error("invalid report json: {0}")]
    Json(#[from] serde_json::Error),
}
