//! # Document Assembler
//!
//! Builds a [`Document`] from a [`ReportModel`] in one pass over the section
//! template (General → Climate → Environmental → Social → Governance).
//!
//! ## Design
//!
//! - Unknown metric keys and out-of-domain values abort the build: no valid
//!   document can exist.
//! - A mandatory concept that is simply absent does **not** abort. It is left
//!   for the validator so that every gap is reported in one batch.
//! - Header-derived concepts (entity name, period dates) come from the
//!   report header only; supplying them as metrics is an error.
//! - The output has one header region, one hidden-fact list, and each
//!   section at most once. There is no repair pass afterwards.

use std::collections::BTreeMap;

use esrs_core::{Period, ReportingEntity};
use esrs_taxonomy::{Cardinality, Catalog, Concept, Profile, SectionId, Source};

use crate::document::{Block, Document, Section};
use crate::encode::FactEncoder;
use crate::error::BuildError;
use crate::policy::GenerationPolicy;
use crate::registry::Registry;
use crate::report::{Disclosure, RawValue, ReportModel};

/// Assemble `report` into a document using the shared catalog.
///
/// # Errors
///
/// See [`Assembler::assemble`].
pub fn assemble(
    report: &ReportModel,
    profile: Profile,
    policy: &GenerationPolicy,
) -> Result<Document, BuildError> {
    let catalog = Catalog::global()?;
    Assembler::new(catalog, profile, policy).assemble(report)
}

/// Assembles documents against one catalog, profile, and policy.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    catalog: &'a Catalog,
    profile: Profile,
    policy: &'a GenerationPolicy,
}

impl<'a> Assembler<'a> {
    /// Create an assembler.
    pub fn new(catalog: &'a Catalog, profile: Profile, policy: &'a GenerationPolicy) -> Self {
        Self {
            catalog,
            profile,
            policy,
        }
    }

    /// Build the document.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Catalog`] for a metric key with no concept.
    /// - [`BuildError::HeaderField`] for a header concept supplied as a metric.
    /// - [`BuildError::Encode`] for a value outside its concept's domain.
    /// - [`BuildError::Core`] for an invalid LEI or a period ending before it
    ///   starts.
    /// - [`BuildError::InvalidCurrency`] and
    ///   [`BuildError::EmptyExclusionReason`] for malformed header or
    ///   exclusion data.
    pub fn assemble(&self, report: &ReportModel) -> Result<Document, BuildError> {
        let span = tracing::info_span!(
            "assemble",
            entity = %report.entity.identifier,
            profile = %self.profile
        );
        let _guard = span.enter();

        let entity = checked_entity(&report.entity)?;
        check_currency(&report.currency)?;
        let period = Period::duration(report.period.start, report.period.end)?;
        self.check_metric_keys(report)?;

        let encoder = FactEncoder::new(
            self.catalog,
            self.policy,
            &report.currency,
            &entity,
            period,
        );
        let mut registry = Registry::new(entity.clone());
        let mut sections = Vec::new();
        let mut hidden = Vec::new();
        let mut exclusions = BTreeMap::new();

        for &section_id in SectionId::template() {
            let mut blocks: Vec<Block> = report
                .narrative
                .get(&section_id)
                .into_iter()
                .flatten()
                .map(|text| Block::Narrative { text: text.clone() })
                .collect();
            let mut excluded_here = false;

            for concept in self.catalog.in_section(section_id) {
                let disclosure = match concept.source {
                    Source::Header => Some(Disclosure::Reported(header_value(concept, report))),
                    Source::Report => report.metrics.get(concept.field).cloned(),
                };
                match disclosure {
                    Some(Disclosure::Reported(raw)) => {
                        let fact = encoder.encode_concept(concept, &raw, &mut registry)?;
                        if concept.hidden {
                            hidden.push(fact);
                        } else {
                            blocks.push(Block::Fact(fact));
                        }
                    }
                    Some(Disclosure::Excluded { excluded }) => {
                        if excluded.trim().is_empty() {
                            return Err(BuildError::EmptyExclusionReason {
                                field: concept.field.to_string(),
                            });
                        }
                        exclusions.insert(concept.qname.clone(), excluded);
                        excluded_here = true;
                    }
                    None => {
                        if self.is_required(concept) {
                            tracing::debug!(
                                concept = %concept.qname,
                                "mandatory concept absent; left for validation"
                            );
                        }
                    }
                }
            }

            if !blocks.is_empty() || excluded_here {
                sections.push(Section {
                    id: section_id,
                    heading: section_id.heading().to_string(),
                    blocks,
                });
            }
        }

        let document = Document {
            profile: self.profile,
            entity,
            entity_name: report.entity_name.clone(),
            period,
            registry,
            sections,
            hidden,
            exclusions,
        };
        tracing::info!(
            facts = document.fact_count(),
            contexts = document.registry.context_count(),
            units = document.registry.unit_count(),
            exclusions = document.exclusions.len(),
            "document assembled"
        );
        Ok(document)
    }

    fn is_required(&self, concept: &Concept) -> bool {
        concept.cardinality != Cardinality::Optional && self.profile.covers(concept.disclosure)
    }

    fn check_metric_keys(&self, report: &ReportModel) -> Result<(), BuildError> {
        for field in report.metrics.keys() {
            let concept = self.catalog.lookup(field)?;
            if concept.source == Source::Header {
                return Err(BuildError::HeaderField {
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Re-run LEI validation for entities that claim the LEI scheme.
fn checked_entity(entity: &ReportingEntity) -> Result<ReportingEntity, BuildError> {
    if entity.is_lei() {
        Ok(ReportingEntity::lei(&entity.identifier)?)
    } else {
        Ok(ReportingEntity::new(&entity.identifier, &entity.scheme)?)
    }
}

fn check_currency(code: &str) -> Result<(), BuildError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(BuildError::InvalidCurrency(code.to_string()))
    }
}

fn header_value(concept: &Concept, report: &ReportModel) -> RawValue {
    match concept.field {
        "reporting_period_start" => RawValue::Text(report.period.start.to_string()),
        "reporting_period_end" => RawValue::Text(report.period.end.to_string()),
        _ => RawValue::Text(report.entity_name.clone()),
    }
}
