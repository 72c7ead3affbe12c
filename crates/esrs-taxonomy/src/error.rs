//! Catalog and profile errors.

use thiserror::Error;

/// Error looking up or loading taxonomy data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A report field has no taxonomy mapping.
    #[error("unknown field {field:?}: no taxonomy concept is mapped to it")]
    UnknownField {
        /// The unmapped field name.
        field: String,
    },

    /// A section identifier is not part of the template.
    #[error("unknown section {0:?}")]
    UnknownSection(String),

    /// A profile label did not name a supported profile.
    #[error("unknown disclosure profile {label:?}; supported: {supported}")]
    UnknownProfile {
        /// The label as given.
        label: String,
        /// Comma-separated supported labels.
        supported: String,
    },

    /// A static catalog entry is malformed. Only reachable through a defect
    /// in the built-in table, which the catalog tests rule out.
    #[error("invalid catalog entry {field:?}: {reason}")]
    InvalidEntry {
        /// Field name of the offending entry.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}
