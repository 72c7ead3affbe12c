//! # Sections and Standards: Single Source of Truth
//!
//! `Standard` enumerates the ESRS topical standards a concept belongs to;
//! `SectionId` enumerates the rendered sections of a sustainability
//! statement in template order. Every `match` on either enum is exhaustive,
//! so adding a standard forces every consumer (catalog, assembler, renderer)
//! to place it.
//!
//! # Template order
//!
//! | # | Section | Standards |
//! |---|---------|-----------|
//! | 1 | General Information | ESRS 2 |
//! | 2 | Climate | E1 |
//! | 3 | Environmental | E2, E3, E4, E5 |
//! | 4 | Social | S1, S2, S3, S4 |
//! | 5 | Governance | G1 |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CatalogError;

/// ESRS standards that carry disclosure requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standard {
    /// ESRS 2: General disclosures.
    General,
    /// E1: Climate change.
    E1,
    /// E2: Pollution.
    E2,
    /// E3: Water and marine resources.
    E3,
    /// E4: Biodiversity and ecosystems.
    E4,
    /// E5: Resource use and circular economy.
    E5,
    /// S1: Own workforce.
    S1,
    /// S2: Workers in the value chain.
    S2,
    /// S3: Affected communities.
    S3,
    /// S4: Consumers and end-users.
    S4,
    /// G1: Business conduct.
    G1,
}

impl Standard {
    /// Returns all standards in canonical order.
    pub fn all() -> &'static [Standard] {
        &[
            Self::General,
            Self::E1,
            Self::E2,
            Self::E3,
            Self::E4,
            Self::E5,
            Self::S1,
            Self::S2,
            Self::S3,
            Self::S4,
            Self::G1,
        ]
    }

    /// The section a standard's concepts render in.
    pub fn section(&self) -> SectionId {
        match self {
            Self::General => SectionId::General,
            Self::E1 => SectionId::Climate,
            Self::E2 | Self::E3 | Self::E4 | Self::E5 => SectionId::Environmental,
            Self::S1 | Self::S2 | Self::S3 | Self::S4 => SectionId::Social,
            Self::G1 => SectionId::Governance,
        }
    }

    /// Short code as printed in the standard, e.g. `"E1"` or `"ESRS 2"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "ESRS 2",
            Self::E1 => "E1",
            Self::E2 => "E2",
            Self::E3 => "E3",
            Self::E4 => "E4",
            Self::E5 => "E5",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::S4 => "S4",
            Self::G1 => "G1",
        }
    }
}

impl std::fmt::Display for Standard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered section of the sustainability statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    /// General Information (ESRS 2).
    General,
    /// Climate change (E1).
    Climate,
    /// Environmental information other than climate (E2–E5).
    Environmental,
    /// Social information (S1–S4).
    Social,
    /// Governance information (G1).
    Governance,
}

/// Total number of sections. Used in compile-time assertions.
pub const SECTION_COUNT: usize = 5;

impl SectionId {
    /// Returns all sections in template order.
    pub fn template() -> &'static [SectionId; SECTION_COUNT] {
        &[
            Self::General,
            Self::Climate,
            Self::Environmental,
            Self::Social,
            Self::Governance,
        ]
    }

    /// The human heading rendered above the section.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::General => "General Information",
            Self::Climate => "Climate Change (E1)",
            Self::Environmental => "Environmental Information (E2\u{2013}E5)",
            Self::Social => "Social Information (S1\u{2013}S4)",
            Self::Governance => "Governance Information (G1)",
        }
    }

    /// The snake_case identifier, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Climate => "climate",
            Self::Environmental => "environmental",
            Self::Social => "social",
            Self::Governance => "governance",
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::template()
            .iter()
            .copied()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_order() {
        let order: Vec<_> = SectionId::template().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            order,
            ["general", "climate", "environmental", "social", "governance"]
        );
    }

    #[test]
    fn test_template_is_sorted_by_ord() {
        let template = SectionId::template();
        assert!(template.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_standard_maps_to_a_section() {
        for standard in Standard::all() {
            assert!(SectionId::template().contains(&standard.section()));
        }
    }

    #[test]
    fn test_environmental_groups_e2_to_e5() {
        for s in [Standard::E2, Standard::E3, Standard::E4, Standard::E5] {
            assert_eq!(s.section(), SectionId::Environmental);
        }
        assert_eq!(Standard::E1.section(), SectionId::Climate);
    }

    #[test]
    fn test_section_from_str_roundtrip() {
        for section in SectionId::template() {
            let parsed: SectionId = section.as_str().parse().unwrap();
            assert_eq!(parsed, *section);
        }
        assert!("finance".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for section in SectionId::template() {
            let json = serde_json::to_string(section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.as_str()));
        }
    }
}
