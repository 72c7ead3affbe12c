//! # Disclosure Profiles
//!
//! A `Profile` selects the taxonomy release and the set of disclosure
//! requirements whose mandatory concepts must be covered. Concepts outside
//! the profile's requirements are treated as optional.
//!
//! Profiles are addressed by their display label, e.g.
//! `"ESRS E1 2023-12-31"`, which is what callers pass on the command line and
//! what the filing manifest records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Taxonomy release the built-in catalog and both profiles target.
pub const TAXONOMY_VERSION: &str = "ESRS Set 1 XBRL Taxonomy 2023-12-22";

/// Schema entry point referenced from `link:schemaRef`.
pub const TAXONOMY_ENTRY_POINT: &str =
    "https://xbrl.efrag.org/taxonomy/esrs/2023-12-22/esrs_all.xsd";

/// A supported disclosure profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Climate-only filing: general information plus gross GHG emissions
    /// (E1-6).
    #[serde(rename = "ESRS E1 2023-12-31")]
    EsrsE1_2023,
    /// Full Set 1 filing: the E1 set plus energy (E1-5), own workforce
    /// headcount (S1-6), and business conduct (G1-1, G1-4).
    #[serde(rename = "ESRS Set 1 2023-12-31")]
    EsrsSet1_2023,
}

impl Profile {
    /// All supported profiles.
    pub fn all() -> &'static [Profile] {
        &[Self::EsrsE1_2023, Self::EsrsSet1_2023]
    }

    /// The display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EsrsE1_2023 => "ESRS E1 2023-12-31",
            Self::EsrsSet1_2023 => "ESRS Set 1 2023-12-31",
        }
    }

    /// Taxonomy release this profile validates against.
    pub fn taxonomy_version(&self) -> &'static str {
        TAXONOMY_VERSION
    }

    /// Schema entry point for `link:schemaRef`.
    pub fn entry_point(&self) -> &'static str {
        TAXONOMY_ENTRY_POINT
    }

    /// Disclosure requirements whose mandatory concepts this profile enforces.
    pub fn disclosures(&self) -> &'static [&'static str] {
        match self {
            Self::EsrsE1_2023 => &["BP-1", "E1-6"],
            Self::EsrsSet1_2023 => &["BP-1", "E1-5", "E1-6", "S1-6", "G1-1", "G1-4"],
        }
    }

    /// Whether the profile enforces `disclosure`.
    pub fn covers(&self, disclosure: &str) -> bool {
        self.disclosures().contains(&disclosure)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Profile {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownProfile {
                label: s.to_string(),
                supported: Self::all()
                    .iter()
                    .map(|p| p.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
