//! # Fact JSON
//!
//! The flat extraction format: one record per fact, in document order,
//! emitted as canonical JSON (RFC 8785) so equal documents give equal bytes.
//!
//! ```json
//! [{"concept":"esrs:GrossScope1GHGEmissions","context":"c-duration-2024-01-01-2024-12-31",
//!   "decimals":3,"scale":0,"unit":"u-tCO2e","value":"120.500"}]
//! ```
//!
//! `decimals`, `scale`, and `unit` are `null` for non-numeric facts.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use esrs_core::{CanonicalBytes, ContextId, QName, UnitId};

use crate::document::Document;
use crate::error::SerializeError;
use crate::fact::{apply_scale, Fact, FactValue};
use crate::validate::Diagnostics;

use super::ensure_validated;

/// One fact in the flat format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactRecord {
    /// Concept QName.
    pub concept: String,
    /// Context id.
    pub context: String,
    /// Unit id for numeric facts.
    pub unit: Option<String>,
    /// The literal with exactly `decimals` fraction digits, or the text.
    pub value: String,
    /// Rounding precision for numeric facts.
    pub decimals: Option<i8>,
    /// Power-of-ten multiplier for numeric facts.
    pub scale: Option<i8>,
}

impl From<&Fact> for FactRecord {
    fn from(fact: &Fact) -> Self {
        let (value, decimals, scale) = match &fact.value {
            FactValue::Numeric {
                literal,
                decimals,
                scale,
            } => (literal.to_string(), Some(*decimals), Some(*scale)),
            FactValue::NonNumeric(text) => (text.clone(), None, None),
        };
        Self {
            concept: fact.concept.to_string(),
            context: fact.context_ref.to_string(),
            unit: fact.unit_ref.as_ref().map(ToString::to_string),
            value,
            decimals,
            scale,
        }
    }
}

impl TryFrom<FactRecord> for Fact {
    type Error = SerializeError;

    fn try_from(record: FactRecord) -> Result<Self, Self::Error> {
        let concept = QName::from_str(&record.concept)
            .map_err(|e| SerializeError::FactJson(e.to_string()))?;
        let value = match (record.decimals, record.scale) {
            (Some(decimals), Some(scale)) => {
                let literal = Decimal::from_str(&record.value).map_err(|e| {
                    SerializeError::FactJson(format!("{}: {e}", record.concept))
                })?;
                if apply_scale(literal, scale).is_none() {
                    return Err(SerializeError::FactJson(format!(
                        "{}: {literal} scaled by 10^{scale} is out of range",
                        record.concept
                    )));
                }
                FactValue::Numeric {
                    literal,
                    decimals,
                    scale,
                }
            }
            (None, None) => FactValue::NonNumeric(record.value),
            _ => {
                return Err(SerializeError::FactJson(format!(
                    "{}: decimals and scale must both be set or both be null",
                    record.concept
                )))
            }
        };
        Ok(Fact {
            concept,
            context_ref: ContextId(record.context),
            unit_ref: record.unit.map(UnitId),
            value,
        })
    }
}

/// The document's facts as flat records, in document order.
pub fn fact_records(doc: &Document) -> Vec<FactRecord> {
    doc.facts().map(FactRecord::from).collect()
}

/// Render the fact list as canonical JSON.
///
/// # Errors
///
/// [`SerializeError::NotValidated`] unless `diagnostics` authorizes `doc`.
pub fn to_fact_json(doc: &Document, diagnostics: &Diagnostics) -> Result<String, SerializeError> {
    ensure_validated(doc, diagnostics)?;
    let records = fact_records(doc);
    Ok(CanonicalBytes::new(&records)?.into_string())
}

/// Parse fact JSON back into facts.
///
/// # Errors
///
/// [`SerializeError::FactJson`] for malformed JSON, an invalid concept name,
/// or a numeric value that does not parse.
pub fn facts_from(json: &str) -> Result<Vec<Fact>, SerializeError> {
    let records: Vec<FactRecord> =
        serde_json::from_str(json).map_err(|e| SerializeError::FactJson(e.to_string()))?;
    records.into_iter().map(Fact::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(value: FactValue, unit: Option<&str>) -> Fact {
        Fact {
            concept: "esrs:GrossScope1GHGEmissions".parse().unwrap(),
            context_ref: ContextId("c-duration-2024-01-01-2024-12-31".into()),
            unit_ref: unit.map(|u| UnitId(u.into())),
            value,
        }
    }

    #[test]
    fn test_numeric_record() {
        let f = fact(
            FactValue::Numeric {
                literal: Decimal::from_str("120.500").unwrap(),
                decimals: 3,
                scale: 0,
            },
            Some("u-tCO2e"),
        );
        let record = FactRecord::from(&f);
        assert_eq!(record.value, "120.500");
        assert_eq!(record.decimals, Some(3));
        assert_eq!(Fact::try_from(record).unwrap(), f);
    }

    #[test]
    fn test_text_record_has_nulls() {
        let record = FactRecord::from(&fact(FactValue::NonNumeric("Zero tolerance.".into()), None));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["decimals"].is_null());
        assert!(json["scale"].is_null());
        assert!(json["unit"].is_null());
    }

    #[test]
    fn test_half_numeric_record_rejected() {
        let json = r#"[{"concept":"esrs:X","context":"c","unit":null,"value":"1","decimals":0,"scale":null}]"#;
        assert!(matches!(facts_from(json), Err(SerializeError::FactJson(_))));
    }

    #[test]
    fn test_bad_number_rejected() {
        let json = r#"[{"concept":"esrs:X","context":"c","unit":"u","value":"twelve","decimals":0,"scale":0}]"#;
        assert!(matches!(facts_from(json), Err(SerializeError::FactJson(_))));
    }

    #[test]
    fn test_unrepresentable_scale_rejected() {
        let json = r#"[{"concept":"esrs:X","context":"c","unit":"u","value":"123.46","decimals":2,"scale":40}]"#;
        let err = facts_from(json).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        let json = r#"[{"concept":"foo:X","context":"c","unit":null,"value":"x","decimals":null,"scale":null}]"#;
        assert!(facts_from(json).is_err());
    }
}
