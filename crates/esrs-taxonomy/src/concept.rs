//! # Concepts
//!
//! A `Concept` is one reportable taxonomy element together with everything
//! the pipeline needs to tag a value against it: the data kind that selects
//! the encoding policy, the period type that selects the context, the
//! measure that selects the unit, and the standard that selects the section.
//!
//! Concepts are immutable and built once from the static table in
//! [`crate::catalog`]; nothing constructs a `Concept` per request.

use serde::Serialize;

use esrs_core::{CoreError, QName, Unit};

use crate::section::{SectionId, Standard};

/// The data kind of a concept. Selects the fact encoding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    /// Amount in the report currency.
    Monetary,
    /// Mass, e.g. tonnes of CO2 equivalent or tonnes of waste.
    Mass,
    /// Energy, in MWh.
    Energy,
    /// Volume, in cubic metres.
    Volume,
    /// Percentage points on a 0–100 scale.
    Percentage,
    /// Non-negative whole number.
    Count,
    /// Ratio of a quantity to an amount of currency.
    Intensity,
    /// Narrative text.
    Text,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
}

impl ConceptKind {
    /// Whether facts of this kind are numeric (`ix:nonFraction`).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text | Self::Date)
    }

    /// The snake_case identifier, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monetary => "monetary",
            Self::Mass => "mass",
            Self::Energy => "energy",
            Self::Volume => "volume",
            Self::Percentage => "percentage",
            Self::Count => "count",
            Self::Intensity => "intensity",
            Self::Text => "text",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a concept must be reported when its disclosure requirement is in
/// scope of the active profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Must appear exactly once, or be excluded with a reason.
    Mandatory,
    /// May be omitted silently.
    Optional,
    /// Expected when the concept's trigger concept is reported.
    Conditional,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
            Self::Conditional => "conditional",
        })
    }
}

/// The period type facts of a concept are reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// The whole reporting period.
    Duration,
    /// The last day of the reporting period.
    Instant,
}

/// How a numeric concept's unit is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Non-numeric concept: no unit.
    None,
    /// The currency declared by the report.
    ReportCurrency,
    /// A fixed measure, e.g. `"utr:tCO2e"`.
    Simple(&'static str),
    /// A fixed numerator over the report currency.
    PerReportCurrency(&'static str),
}

/// Where a concept's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Supplied as a metric in the report.
    Report,
    /// Derived from the report header (entity name, period dates).
    Header,
}

/// A taxonomy concept with its tagging metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concept {
    /// Semantic field name used by report models.
    pub field: &'static str,
    /// Taxonomy-qualified element name.
    pub qname: QName,
    /// Human label rendered next to the value.
    pub label: &'static str,
    /// Data kind.
    pub kind: ConceptKind,
    /// Base cardinality within the concept's disclosure requirement.
    pub cardinality: Cardinality,
    /// Context period type.
    pub period_type: PeriodType,
    /// Unit selection.
    pub measure: Measure,
    /// Owning standard.
    pub standard: Standard,
    /// Disclosure requirement code, e.g. `"E1-6"`.
    pub disclosure: &'static str,
    /// Value origin.
    pub source: Source,
    /// Rendered inside `ix:hidden` rather than in the body.
    pub hidden: bool,
    /// For `Conditional` concepts: the field whose presence makes this
    /// concept expected.
    pub trigger: Option<&'static str>,
}

impl Concept {
    /// The section the concept renders in.
    pub fn section(&self) -> SectionId {
        self.standard.section()
    }

    /// Resolve the unit for a fact of this concept.
    ///
    /// Returns `Ok(None)` for non-numeric concepts.
    ///
    /// # Errors
    ///
    /// Propagates [`CoreError`] when `currency` is not a valid ISO 4217 local
    /// name.
    pub fn unit(&self, currency: &str) -> Result<Option<Unit>, CoreError> {
        let unit = match self.measure {
            Measure::None => return Ok(None),
            Measure::ReportCurrency => Unit::currency(currency)?,
            Measure::Simple(measure) => Unit::simple(measure)?,
            Measure::PerReportCurrency(numerator) => Unit::Ratio {
                numerator: numerator.parse()?,
                denominator: QName::new("iso4217", currency)?,
            },
        };
        Ok(Some(unit))
    }
}
