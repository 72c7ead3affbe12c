//! # Generation Pipeline
//!
//! `generate` runs assemble → validate → serialize as one strict sequence.
//! Each call owns its registry and document; the catalog is the only shared
//! state, so independent reports can be generated on separate threads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use esrs_core::{sha256_digest, CanonicalBytes, ContentDigest, Timestamp};
use esrs_taxonomy::{Catalog, Profile};

use crate::assemble::Assembler;
use crate::document::Document;
use crate::error::{BuildError, SerializeError};
use crate::policy::GenerationPolicy;
use crate::report::ReportModel;
use crate::serialize::{fact_records, to_fact_json, to_ixbrl_xhtml};
use crate::validate::{Diagnostics, Validator};

/// Why a filing was not produced.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The report could not be assembled into a document.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    /// Validation found errors. The diagnostics list all of them.
    #[error("validation rejected the document: {} error(s)", .0.errors.len())]
    Rejected(Box<Diagnostics>),

    /// A serializer failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] SerializeError),
}

/// Provenance of a filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Profile the filing was generated under.
    pub profile: Profile,
    /// Taxonomy release of the profile.
    pub taxonomy_version: String,
    /// The injected generation time.
    pub generated_at: Timestamp,
    /// Number of tagged facts.
    pub fact_count: usize,
    /// Digest of the validated document.
    pub document_digest: ContentDigest,
    /// Digest of the fact JSON.
    pub facts_digest: ContentDigest,
}

/// The artifacts of one successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Filing {
    /// The Inline XBRL document.
    pub xhtml: String,
    /// Canonical fact JSON.
    pub fact_json: String,
    /// Validation outcome (warnings only).
    pub diagnostics: Diagnostics,
    /// Provenance.
    pub manifest: Manifest,
}

/// Assemble and validate `report` without serializing.
///
/// # Errors
///
/// [`BuildError`] when the report cannot be assembled. Validation findings
/// are returned in the [`Diagnostics`], never as an error.
pub fn check(
    report: &ReportModel,
    profile: Profile,
    policy: &GenerationPolicy,
) -> Result<(Document, Diagnostics), BuildError> {
    let catalog = Catalog::global()?;
    let document = Assembler::new(catalog, profile, policy).assemble(report)?;
    let diagnostics = Validator::new(catalog, profile)
        .with_tolerance(policy.sum_tolerance)
        .validate(&document);
    Ok((document, diagnostics))
}

/// Generate the filing for `report`.
///
/// # Errors
///
/// - [`GenerateError::Build`] when assembly fails.
/// - [`GenerateError::Rejected`] when validation finds any error.
/// - [`GenerateError::Serialize`] when a serializer fails.
pub fn generate(
    report: &ReportModel,
    profile: Profile,
    policy: &GenerationPolicy,
    generated_at: Timestamp,
) -> Result<Filing, GenerateError> {
    let span = tracing::info_span!(
        "generate",
        entity = %report.entity.identifier,
        profile = %profile
    );
    let _guard = span.enter();

    let (document, diagnostics) = check(report, profile, policy)?;
    if diagnostics.has_errors() {
        tracing::warn!(
            errors = diagnostics.errors.len(),
            "document rejected by validation"
        );
        return Err(GenerateError::Rejected(Box::new(diagnostics)));
    }

    let xhtml = to_ixbrl_xhtml(&document, &diagnostics, generated_at)?;
    let fact_json = to_fact_json(&document, &diagnostics)?;

    let document_digest = document.digest().map_err(SerializeError::from)?;
    let facts_digest = sha256_digest(
        &CanonicalBytes::new(&fact_records(&document)).map_err(SerializeError::from)?,
    );
    let manifest = Manifest {
        profile,
        taxonomy_version: profile.taxonomy_version().to_string(),
        generated_at,
        fact_count: document.fact_count(),
        document_digest,
        facts_digest,
    };

    tracing::info!(
        facts = manifest.fact_count,
        warnings = diagnostics.warnings.len(),
        digest = %manifest.document_digest,
        "filing generated"
    );
    Ok(Filing {
        xhtml,
        fact_json,
        diagnostics,
        manifest,
    })
}
