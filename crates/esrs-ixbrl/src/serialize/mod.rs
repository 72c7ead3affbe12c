//! # Serializers
//!
//! Pure renderings of a validated [`Document`]:
//!
//! - [`to_ixbrl_xhtml`] emits the Inline XBRL filing.
//! - [`to_fact_json`] emits the flat fact list as canonical JSON.
//! - [`extract_facts`] and [`facts_from`] read either form back into
//!   [`Fact`](crate::fact::Fact)s, so the two forms can be checked against
//!   each other.
//!
//! ## Invariant
//!
//! Both writers refuse to run unless handed [`Diagnostics`] that carry zero
//! errors and were computed for this exact document (same digest, same
//! profile). The only time-varying input is the explicit `generated_at`
//! argument of the XHTML writer.

mod extract;
mod json;
mod xhtml;

pub use extract::extract_facts;
pub use json::{fact_records, facts_from, to_fact_json, FactRecord};
pub use xhtml::{display_literal, to_ixbrl_xhtml};

use crate::document::Document;
use crate::error::SerializeError;
use crate::validate::Diagnostics;

/// Check that `diagnostics` authorizes serializing `doc`.
///
/// # Errors
///
/// [`SerializeError::NotValidated`] when the diagnostics carry errors, were
/// computed under another profile, or belong to a different document.
pub fn ensure_validated(doc: &Document, diagnostics: &Diagnostics) -> Result<(), SerializeError> {
    let refuse = |reason: String| Err(SerializeError::NotValidated { reason });

    if diagnostics.has_errors() {
        return refuse(format!(
            "{} unresolved validation error(s), first: {}",
            diagnostics.errors.len(),
            diagnostics.errors[0]
        ));
    }
    if diagnostics.profile != doc.profile {
        return refuse(format!(
            "diagnostics are for profile {}, document uses {}",
            diagnostics.profile, doc.profile
        ));
    }
    let Some(validated) = &diagnostics.document_digest else {
        return refuse("diagnostics carry no document digest".to_string());
    };
    let current = doc.digest()?;
    if *validated != current {
        return refuse(format!(
            "diagnostics were computed for {validated}, document is {current}"
        ));
    }
    Ok(())
}
