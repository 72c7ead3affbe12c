//! # Document Validation
//!
//! Runs every structural and regulatory check over a finished [`Document`]
//! and returns [`Diagnostics`]. Validation never fails: a check that finds a
//! defect adds a diagnostic and the remaining checks still run, so one pass
//! reports every problem.
//!
//! ## Checks
//!
//! | # | Check | Diagnostic | Severity |
//! |---|-------|------------|----------|
//! | 1 | Every `contextRef`/`unitRef` resolves; facts name catalog concepts; numeric facts (and only those) carry a unit | `DanglingReference`, `UnknownConcept`, `UnitMismatch` | error |
//! | 2 | No duplicate `(concept, context, unit)` | `DuplicateFact` | error |
//! | 3 | Mandatory concepts reported or excluded | `MissingMandatoryConcept` | error |
//! | 4 | Numeric values are representable; totals match the sum of their components | `ValueOutOfRange`, `SumMismatch` | error |
//! | 5 | All contexts report on the document's entity | `MultiEntity` | error |
//! | 6 | Every context and unit is referenced | `UnusedRegistryEntry` | warning |
//! | 7 | Triggered conditional concepts reported or excluded | `MissingConditionalConcept` | warning |
//! | 8 | No concept both reported and excluded | `ConflictingExclusion` | error |
//!
//! ## Binding
//!
//! `Diagnostics` records the digest of the document it was computed for.
//! The serializers refuse diagnostics with errors, and diagnostics whose
//! digest does not match the document being serialized.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use esrs_core::{ContentDigest, ContextId, QName, ReportingEntity, UnitId};
use esrs_taxonomy::{Catalog, Profile};

use crate::document::Document;
use crate::fact::{apply_scale, Fact, FactValue};

/// Digits kept in a reported sum difference.
const DIFF_DP: u32 = 6;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks serialization.
    Error,
    /// Advisory only.
    Warning,
}

/// What kind of registry entry a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A context.
    Context,
    /// A unit.
    Unit,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Context => "context",
            Self::Unit => "unit",
        })
    }
}

/// A single finding.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum Diagnostic {
    /// A fact points at a context or unit the registry does not hold.
    #[error("fact {concept} references {kind} {id:?}, which is not in the registry")]
    DanglingReference {
        /// The fact's concept.
        concept: QName,
        /// Context or unit.
        kind: EntryKind,
        /// The unresolved id.
        id: String,
    },

    /// A fact names a concept outside the catalog.
    #[error("concept {concept} is not in the taxonomy catalog")]
    UnknownConcept {
        /// The unknown concept.
        concept: QName,
    },

    /// A numeric fact without a unit, or a text fact with one.
    #[error("fact {concept}: {reason}")]
    UnitMismatch {
        /// The fact's concept.
        concept: QName,
        /// What is wrong.
        reason: String,
    },

    /// Two facts share `(concept, context, unit)`.
    #[error("duplicate fact {concept} in context {context}")]
    DuplicateFact {
        /// The concept.
        concept: QName,
        /// The shared context.
        context: ContextId,
        /// The shared unit.
        unit: Option<UnitId>,
    },

    /// A mandatory concept is neither reported nor excluded.
    #[error("mandatory concept {concept} is neither reported nor excluded")]
    MissingMandatoryConcept {
        /// The missing concept.
        concept: QName,
    },

    /// A total differs from the sum of its components beyond tolerance.
    #[error(
        "{rule}: {total} is {actual} but its components sum to {expected} \
         (relative difference {diff}, tolerance {tolerance})"
    )]
    SumMismatch {
        /// The summation rule's name.
        rule: String,
        /// The total concept.
        total: QName,
        /// Context of the compared facts.
        context: ContextId,
        /// Sum of the components.
        expected: Decimal,
        /// Reported total.
        actual: Decimal,
        /// `|actual − expected| / |expected|`.
        diff: Decimal,
        /// The tolerance that was exceeded.
        tolerance: Decimal,
    },

    /// A numeric fact whose `literal × 10^scale` leaves the decimal range.
    #[error("fact {concept}: {literal} scaled by 10^{scale} is out of range")]
    ValueOutOfRange {
        /// The fact's concept.
        concept: QName,
        /// The displayed literal.
        literal: Decimal,
        /// The fact's scale.
        scale: i8,
    },

    /// A context reports on a different entity.
    #[error("context {context} reports on {found}, but the document reports on {expected}")]
    MultiEntity {
        /// The offending context.
        context: ContextId,
        /// The document entity.
        expected: ReportingEntity,
        /// The context's entity.
        found: ReportingEntity,
    },

    /// A registry entry no fact refers to.
    #[error("{kind} {id:?} is not referenced by any fact")]
    UnusedRegistryEntry {
        /// Context or unit.
        kind: EntryKind,
        /// Its id.
        id: String,
    },

    /// A conditional concept whose trigger is reported is missing.
    #[error("{concept} is expected because {trigger} is reported")]
    MissingConditionalConcept {
        /// The expected concept.
        concept: QName,
        /// The reported trigger concept.
        trigger: QName,
    },

    /// A concept is both reported and excluded.
    #[error("{concept} is both reported and excluded")]
    ConflictingExclusion {
        /// The concept.
        concept: QName,
    },

    /// The validator could not run a check at all.
    #[error("validation could not run: {reason}")]
    ValidatorUnavailable {
        /// Why.
        reason: String,
    },
}

impl Diagnostic {
    /// Stable code, equal to the serde tag.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DanglingReference { .. } => "DanglingReference",
            Self::UnknownConcept { .. } => "UnknownConcept",
            Self::UnitMismatch { .. } => "UnitMismatch",
            Self::DuplicateFact { .. } => "DuplicateFact",
            Self::MissingMandatoryConcept { .. } => "MissingMandatoryConcept",
            Self::SumMismatch { .. } => "SumMismatch",
            Self::ValueOutOfRange { .. } => "ValueOutOfRange",
            Self::MultiEntity { .. } => "MultiEntity",
            Self::UnusedRegistryEntry { .. } => "UnusedRegistryEntry",
            Self::MissingConditionalConcept { .. } => "MissingConditionalConcept",
            Self::ConflictingExclusion { .. } => "ConflictingExclusion",
            Self::ValidatorUnavailable { .. } => "ValidatorUnavailable",
        }
    }

    /// Whether this blocks serialization.
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnusedRegistryEntry { .. } | Self::MissingConditionalConcept { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// The outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Profile the document was validated under.
    pub profile: Profile,
    /// Digest of the validated document. `None` if it could not be computed.
    pub document_digest: Option<ContentDigest>,
    /// Blocking findings.
    pub errors: Vec<Diagnostic>,
    /// Advisory findings.
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Whether any error was found.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether nothing at all was found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Errors then warnings.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.errors {
            writeln!(f, "error[{}]: {d}", d.code())?;
        }
        for d in &self.warnings {
            writeln!(f, "warning[{}]: {d}", d.code())?;
        }
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        )
    }
}

/// Validate `doc` under `profile` with the default tolerance.
pub fn validate(doc: &Document, profile: Profile) -> Diagnostics {
    validate_with_tolerance(doc, profile, crate::policy::GenerationPolicy::default().sum_tolerance)
}

/// Validate `doc` under `profile` with an explicit sum tolerance.
pub fn validate_with_tolerance(doc: &Document, profile: Profile, tolerance: Decimal) -> Diagnostics {
    match Catalog::global() {
        Ok(catalog) => Validator::new(catalog, profile)
            .with_tolerance(tolerance)
            .validate(doc),
        Err(e) => {
            let mut out = Diagnostics {
                profile,
                document_digest: None,
                errors: Vec::new(),
                warnings: Vec::new(),
            };
            out.push(Diagnostic::ValidatorUnavailable {
                reason: e.to_string(),
            });
            out
        }
    }
}

/// Runs the checks against one catalog and profile.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a Catalog,
    profile: Profile,
    tolerance: Decimal,
}

impl<'a> Validator<'a> {
    /// A validator with the default tolerance.
    pub fn new(catalog: &'a Catalog, profile: Profile) -> Self {
        Self {
            catalog,
            profile,
            tolerance: crate::policy::GenerationPolicy::default().sum_tolerance,
        }
    }

    /// Override the sum tolerance.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run every check.
    pub fn validate(&self, doc: &Document) -> Diagnostics {
        let span = tracing::info_span!("validate", profile = %self.profile);
        let _guard = span.enter();

        let mut out = Diagnostics {
            profile: self.profile,
            document_digest: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        match doc.digest() {
            Ok(digest) => out.document_digest = Some(digest),
            Err(e) => out.push(Diagnostic::ValidatorUnavailable {
                reason: format!("document digest: {e}"),
            }),
        }

        let facts: Vec<&Fact> = doc.facts().collect();
        self.check_references(doc, &facts, &mut out);
        self.check_duplicates(&facts, &mut out);
        self.check_mandatory(doc, &facts, &mut out);
        self.check_sums(&facts, &mut out);
        self.check_entity(doc, &mut out);
        self.check_unused(doc, &facts, &mut out);
        self.check_conditional(doc, &facts, &mut out);
        self.check_exclusion_conflicts(doc, &facts, &mut out);

        tracing::info!(
            errors = out.errors.len(),
            warnings = out.warnings.len(),
            "validation complete"
        );
        out
    }

    // ── 1. Reference integrity ──

    fn check_references(&self, doc: &Document, facts: &[&Fact], out: &mut Diagnostics) {
        for fact in facts {
            if doc.registry.context(&fact.context_ref).is_none() {
                out.push(Diagnostic::DanglingReference {
                    concept: fact.concept.clone(),
                    kind: EntryKind::Context,
                    id: fact.context_ref.to_string(),
                });
            }
            if let Some(unit) = &fact.unit_ref {
                if doc.registry.unit(unit).is_none() {
                    out.push(Diagnostic::DanglingReference {
                        concept: fact.concept.clone(),
                        kind: EntryKind::Unit,
                        id: unit.to_string(),
                    });
                }
            }
            match (fact.value.is_numeric(), fact.unit_ref.is_some()) {
                (true, false) => out.push(Diagnostic::UnitMismatch {
                    concept: fact.concept.clone(),
                    reason: "numeric fact has no unit".to_string(),
                }),
                (false, true) => out.push(Diagnostic::UnitMismatch {
                    concept: fact.concept.clone(),
                    reason: "non-numeric fact carries a unit".to_string(),
                }),
                _ => {}
            }
        }

        let named = facts
            .iter()
            .map(|f| &f.concept)
            .chain(doc.exclusions.keys())
            .collect::<BTreeSet<_>>();
        for concept in named {
            if self.catalog.by_qname(concept).is_none() {
                out.push(Diagnostic::UnknownConcept {
                    concept: concept.clone(),
                });
            }
        }
    }

    // ── 2. Uniqueness ──

    fn check_duplicates(&self, facts: &[&Fact], out: &mut Diagnostics) {
        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        for fact in facts {
            let key = fact.key();
            if !seen.insert(key) && reported.insert(key) {
                out.push(Diagnostic::DuplicateFact {
                    concept: fact.concept.clone(),
                    context: fact.context_ref.clone(),
                    unit: fact.unit_ref.clone(),
                });
            }
        }
    }

    // ── 3. Mandatory coverage ──

    fn check_mandatory(&self, doc: &Document, facts: &[&Fact], out: &mut Diagnostics) {
        let present: BTreeSet<&QName> = facts.iter().map(|f| &f.concept).collect();
        for concept in self.catalog.mandatory_concepts(self.profile) {
            if !present.contains(&concept) && !doc.exclusions.contains_key(&concept) {
                out.push(Diagnostic::MissingMandatoryConcept { concept });
            }
        }
    }

    // ── 4. Sum consistency ──

    fn check_sums(&self, facts: &[&Fact], out: &mut Diagnostics) {
        // First numeric value per (concept, context); duplicates are check 2's concern.
        let mut values: BTreeMap<(&QName, &ContextId), Decimal> = BTreeMap::new();
        for fact in facts {
            let FactValue::Numeric { literal, scale, .. } = &fact.value else {
                continue;
            };
            match apply_scale(*literal, *scale) {
                Some(v) => {
                    values.entry((&fact.concept, &fact.context_ref)).or_insert(v);
                }
                None => out.push(Diagnostic::ValueOutOfRange {
                    concept: fact.concept.clone(),
                    literal: *literal,
                    scale: *scale,
                }),
            }
        }

        for rule in self.catalog.summations() {
            for fact in facts.iter().filter(|f| f.concept == rule.total) {
                let Some(&actual) = values.get(&(&fact.concept, &fact.context_ref)) else {
                    continue;
                };
                let components: Vec<Decimal> = rule
                    .components
                    .iter()
                    .filter_map(|c| values.get(&(c, &fact.context_ref)).copied())
                    .collect();
                if components.is_empty() {
                    continue;
                }
                let expected: Decimal = components.iter().copied().sum();
                let diff = relative_difference(expected, actual);
                if diff > self.tolerance {
                    out.push(Diagnostic::SumMismatch {
                        rule: rule.name.to_string(),
                        total: rule.total.clone(),
                        context: fact.context_ref.clone(),
                        expected: expected.normalize(),
                        actual: actual.normalize(),
                        diff: diff
                            .round_dp_with_strategy(DIFF_DP, RoundingStrategy::MidpointAwayFromZero)
                            .normalize(),
                        tolerance: self.tolerance,
                    });
                }
                break;
            }
        }
    }

    // ── 5. Single entity ──

    fn check_entity(&self, doc: &Document, out: &mut Diagnostics) {
        for context in doc.registry.contexts() {
            if context.entity != doc.entity {
                out.push(Diagnostic::MultiEntity {
                    context: context.id.clone(),
                    expected: doc.entity.clone(),
                    found: context.entity.clone(),
                });
            }
        }
    }

    // ── 6. Unused registry entries ──

    fn check_unused(&self, doc: &Document, facts: &[&Fact], out: &mut Diagnostics) {
        let contexts: BTreeSet<&ContextId> = facts.iter().map(|f| &f.context_ref).collect();
        let units: BTreeSet<&UnitId> = facts.iter().filter_map(|f| f.unit_ref.as_ref()).collect();
        for context in doc.registry.contexts() {
            if !contexts.contains(&context.id) {
                out.push(Diagnostic::UnusedRegistryEntry {
                    kind: EntryKind::Context,
                    id: context.id.to_string(),
                });
            }
        }
        for (id, _) in doc.registry.units() {
            if !units.contains(id) {
                out.push(Diagnostic::UnusedRegistryEntry {
                    kind: EntryKind::Unit,
                    id: id.to_string(),
                });
            }
        }
    }

    // ── 7. Conditional coverage ──

    fn check_conditional(&self, doc: &Document, facts: &[&Fact], out: &mut Diagnostics) {
        let present: BTreeSet<&QName> = facts.iter().map(|f| &f.concept).collect();
        for (concept, trigger) in self.catalog.conditional_concepts() {
            if present.contains(&trigger.qname)
                && !present.contains(&concept.qname)
                && !doc.exclusions.contains_key(&concept.qname)
            {
                out.push(Diagnostic::MissingConditionalConcept {
                    concept: concept.qname.clone(),
                    trigger: trigger.qname.clone(),
                });
            }
        }
    }

    // ── 8. Exclusion conflicts ──

    fn check_exclusion_conflicts(&self, doc: &Document, facts: &[&Fact], out: &mut Diagnostics) {
        let present: BTreeSet<&QName> = facts.iter().map(|f| &f.concept).collect();
        for concept in doc.exclusions.keys() {
            if present.contains(concept) {
                out.push(Diagnostic::ConflictingExclusion {
                    concept: concept.clone(),
                });
            }
        }
    }
}

/// `|actual − expected| / |expected|`; when `expected` is zero, 0 if
/// `actual` is also zero and 1 otherwise.
pub fn relative_difference(expected: Decimal, actual: Decimal) -> Decimal {
    let delta = (actual - expected).abs();
    if expected.is_zero() {
        if delta.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE
        }
    } else {
        delta / expected.abs()
    }
}
