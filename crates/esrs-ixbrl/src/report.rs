//! # Report Model
//!
//! The finished input handed over by data-entry collaborators: who reports,
//! for which period, in which currency, and one entry per disclosed metric.
//! A metric is either a reported value or an explicit exclusion with a
//! reason:
//!
//! ```yaml
//! entity:
//!   identifier: 529900T8BM49AURSDO55
//!   scheme: http://standards.iso.org/iso/17442
//! entity_name: Acme Industrials SE
//! period: { start: 2024-01-01, end: 2024-12-31 }
//! currency: EUR
//! metrics:
//!   scope1: 120.5
//!   scope2_market: 60.0
//!   transition_plan: "We will halve Scope 1 emissions by 2030."
//!   scope3: { excluded: "Not material per double materiality assessment" }
//! ```
//!
//! Metric keys are semantic field names from the concept catalog. They are
//! not checked here; the assembler rejects unknown keys.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use esrs_core::ReportingEntity;
use esrs_taxonomy::SectionId;

use crate::error::ReportError;

/// A sustainability report ready to be tagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportModel {
    /// The reporting undertaking.
    pub entity: ReportingEntity,
    /// Legal name of the undertaking.
    pub entity_name: String,
    /// Reporting period.
    pub period: ReportingPeriod,
    /// ISO 4217 code for monetary amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Disclosed metrics keyed by catalog field name.
    #[serde(default)]
    pub metrics: BTreeMap<String, Disclosure>,
    /// Narrative paragraphs rendered at the top of a section.
    #[serde(default)]
    pub narrative: BTreeMap<SectionId, Vec<String>>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// First and last day of the reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

/// One metric entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Disclosure {
    /// Not disclosed, with the reason (e.g. not material).
    Excluded {
        /// Why the metric is omitted.
        excluded: String,
    },
    /// A reported value.
    Reported(RawValue),
}

/// A value as supplied by the report, before encoding.
///
/// Strings stay [`RawValue::Text`] exactly as written, even when they look
/// like numbers; numeric kinds parse them when encoding. Bare YAML/JSON
/// numbers become [`RawValue::Number`], but they pass through `f64` on the
/// way in, so trailing zeros are lost (`12.50` reads as `12.5`). Quote a
/// value whose reported precision matters: `gender_pay_gap: "12.50"`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A bare number.
    Number(Decimal),
    /// A string, verbatim.
    Text(String),
}

impl Serialize for RawValue {
    /// Numbers are written as decimal strings so no digit is lost.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_str(&n.to_string()),
            Self::Text(t) => serializer.serialize_str(t),
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::Text(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        Ok(RawValue::Number(Decimal::from(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<RawValue, E> {
        Decimal::try_from_i128_with_scale(v, 0)
            .map(RawValue::Number)
            .map_err(E::custom)
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<RawValue, E> {
        let v = i128::try_from(v).map_err(E::custom)?;
        self.visit_i128(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
        // Shortest round-trip rendering, never exponent notation.
        Decimal::from_str(&v.to_string())
            .map(RawValue::Number)
            .map_err(|e| E::custom(format!("{v} is not a representable decimal: {e}")))
    }
}

impl RawValue {
    /// The value as it would be displayed back to the user.
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t.clone(),
        }
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl ReportModel {
    /// A report with no metrics, reporting in EUR.
    pub fn new(
        entity: ReportingEntity,
        entity_name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            entity,
            entity_name: entity_name.into(),
            period: ReportingPeriod { start, end },
            currency: default_currency(),
            metrics: BTreeMap::new(),
            narrative: BTreeMap::new(),
        }
    }

    /// Parse a report from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ReportError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a report from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set a reported value.
    pub fn with_metric(mut self, field: &str, value: impl Into<RawValue>) -> Self {
        self.metrics
            .insert(field.to_string(), Disclosure::Reported(value.into()));
        self
    }

    /// Mark a metric as not disclosed.
    pub fn with_exclusion(mut self, field: &str, reason: &str) -> Self {
        self.metrics.insert(
            field.to_string(),
            Disclosure::Excluded {
                excluded: reason.to_string(),
            },
        );
        self
    }

    /// Remove a metric entirely.
    pub fn without(mut self, field: &str) -> Self {
        self.metrics.remove(field);
        self
    }

    /// Set the report currency.
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    /// Append a narrative paragraph to a section.
    pub fn with_narrative(mut self, section: SectionId, text: &str) -> Self {
        self.narrative
            .entry(section)
            .or_default()
            .push(text.to_string());
        self
    }
}
