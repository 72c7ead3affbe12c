//! # esrs-ixbrl: Inline XBRL Generation & Validation
//!
//! Turns an ESRS sustainability [`ReportModel`] into an Inline XBRL filing.
//!
//! ```text
//! ReportModel ──► FactEncoder ──► Assembler ──► Validator ──► Serializers
//!                  (Catalog,        (Document)   (Diagnostics)  (XHTML, JSON)
//!                   Registry)
//! ```
//!
//! ## Pipeline
//!
//! - [`assemble`] builds a [`Document`] in one pass over the section
//!   template. Unknown fields and out-of-domain values abort; absent
//!   mandatory concepts are deferred to validation.
//! - [`validate`] runs every check and returns [`Diagnostics`]. It never
//!   fails.
//! - [`to_ixbrl_xhtml`] and [`to_fact_json`] render the same document and
//!   refuse to run without diagnostics that have zero errors and match the
//!   document's digest.
//! - [`generate`] chains the three and returns a [`Filing`].
//!
//! ## Crate Policy
//!
//! - Depends on `esrs-core` and `esrs-taxonomy` only.
//! - No ambient clock: `generated_at` is always passed in.
//! - Every numeric value is a `rust_decimal::Decimal`; no floats.
//! - No repair pass: a malformed document cannot be produced by the
//!   assembler, and anything the validator finds blocks serialization.

pub mod assemble;
pub mod document;
pub mod encode;
pub mod error;
pub mod fact;
pub mod pipeline;
pub mod policy;
pub mod registry;
pub mod report;
pub mod serialize;
pub mod validate;

pub use assemble::{assemble, Assembler};
pub use document::{Block, Document, Section};
pub use encode::{encode_value, monetary_scale, FactEncoder, MONETARY_DECIMALS};
pub use error::{
    BuildError, ConfigError, EncodeError, RegistryError, ReportError, SerializeError,
};
pub use fact::{apply_scale, Fact, FactValue};
pub use pipeline::{check, generate, Filing, GenerateError, Manifest};
pub use policy::{GenerationPolicy, MonetaryScaling, ScaleUnit};
pub use registry::{Context, Registry};
pub use report::{Disclosure, RawValue, ReportModel, ReportingPeriod};
pub use serialize::{
    ensure_validated, extract_facts, fact_records, facts_from, to_fact_json, to_ixbrl_xhtml,
    FactRecord,
};
pub use validate::{
    relative_difference, validate, validate_with_tolerance, Diagnostic, Diagnostics, EntryKind,
    Severity, Validator,
};
