//! # Document
//!
//! The in-memory filing: one entity, one registry, the rendered sections in
//! template order, the hidden facts, and the recorded exclusions. Every
//! serialized form is derived from this one tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use esrs_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, Period, QName,
    ReportingEntity,
};
use esrs_taxonomy::{Profile, SectionId};

use crate::fact::Fact;
use crate::registry::Registry;

/// A content block of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of untagged text.
    Narrative {
        /// Paragraph text.
        text: String,
    },
    /// A tagged fact.
    Fact(Fact),
}

/// A rendered section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Template slot.
    pub id: SectionId,
    /// Human heading.
    pub heading: String,
    /// Blocks in render order.
    pub blocks: Vec<Block>,
}

impl Section {
    /// Facts of this section in render order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Fact(f) => Some(f),
            Block::Narrative { .. } => None,
        })
    }
}

/// An assembled filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Profile the document was assembled under.
    pub profile: Profile,
    /// The single reporting entity.
    pub entity: ReportingEntity,
    /// Legal name, for the title.
    pub entity_name: String,
    /// The reporting period.
    pub period: Period,
    /// Interned contexts and units.
    pub registry: Registry,
    /// Sections in template order.
    pub sections: Vec<Section>,
    /// Facts carried in `ix:hidden`.
    pub hidden: Vec<Fact>,
    /// Concepts deliberately not disclosed, with the reason.
    pub exclusions: BTreeMap<QName, String>,
}

impl Document {
    /// All facts in document order: hidden facts first, then sections.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.hidden
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.facts()))
    }

    /// Number of facts.
    pub fn fact_count(&self) -> usize {
        self.facts().count()
    }

    /// The section for `id`, if it was rendered.
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// SHA-256 of the canonical JSON form. Diagnostics are bound to it.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&CanonicalBytes::new(self)?))
    }
}
