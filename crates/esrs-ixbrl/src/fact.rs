//! # Facts
//!
//! A fact is one tagged value: a concept, the context it is reported
//! against, a unit for numeric values, and the value itself.
//!
//! ## Invariant
//!
//! `unit_ref` is `Some` exactly when `value` is [`FactValue::Numeric`]. The
//! encoder only produces facts that hold this; the validator reports facts
//! that do not.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use esrs_core::{ContextId, QName, UnitId};

/// A tagged value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// The taxonomy concept.
    pub concept: QName,
    /// The context id.
    pub context_ref: ContextId,
    /// The unit id for numeric facts.
    pub unit_ref: Option<UnitId>,
    /// The value.
    pub value: FactValue,
}

/// A fact value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactValue {
    /// A number as displayed: the true value is `literal × 10^scale`.
    Numeric {
        /// The displayed literal, carrying exactly `decimals` fraction digits.
        literal: Decimal,
        /// Rounding precision of `literal`.
        decimals: i8,
        /// Power-of-ten multiplier.
        scale: i8,
    },
    /// Text, verbatim.
    NonNumeric(String),
}

impl FactValue {
    /// Whether the value is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. })
    }

    /// The value the literal stands for (`literal × 10^scale`). `None` for
    /// text, and for a scale that leaves the decimal range.
    pub fn reconstructed(&self) -> Option<Decimal> {
        match self {
            Self::Numeric { literal, scale, .. } => apply_scale(*literal, *scale),
            Self::NonNumeric(_) => None,
        }
    }
}

impl Fact {
    /// The identity used for duplicate detection.
    pub fn key(&self) -> (&QName, &ContextId, Option<&UnitId>) {
        (&self.concept, &self.context_ref, self.unit_ref.as_ref())
    }
}

/// `value × 10^scale`, or `None` when the result is not representable.
pub fn apply_scale(value: Decimal, scale: i8) -> Option<Decimal> {
    let factor = pow10(scale.unsigned_abs())?;
    if scale >= 0 {
        value.checked_mul(factor)
    } else {
        value.checked_div(factor)
    }
}

/// `10^exp` as a decimal, or `None` above 10^28.
pub(crate) fn pow10(exp: u8) -> Option<Decimal> {
    (0..exp).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::TEN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_reconstruct_scaled_literal() {
        let v = FactValue::Numeric {
            literal: d("123.46"),
            decimals: 2,
            scale: 6,
        };
        assert_eq!(v.reconstructed(), Some(d("123460000")));
    }

    #[test]
    fn test_text_has_no_reconstruction() {
        assert_eq!(FactValue::NonNumeric("x".into()).reconstructed(), None);
        assert!(!FactValue::NonNumeric("x".into()).is_numeric());
    }

    #[test]
    fn test_negative_scale() {
        assert_eq!(apply_scale(d("5"), -2), Some(d("0.05")));
    }

    #[test]
    fn test_scale_overflow_is_none() {
        assert_eq!(pow10(28), Some(d("10000000000000000000000000000")));
        assert_eq!(pow10(29), None);
        assert_eq!(apply_scale(d("1"), 29), None);
        assert_eq!(apply_scale(d("79228162514264337593543950335"), 1), None);
        let v = FactValue::Numeric {
            literal: d("123.46"),
            decimals: 2,
            scale: 120,
        };
        assert_eq!(v.reconstructed(), None);
    }

    #[test]
    fn test_json_shape() {
        let fact = Fact {
            concept: "esrs:GrossScope1GHGEmissions".parse().unwrap(),
            context_ref: ContextId("c-duration-2024-01-01-2024-12-31".into()),
            unit_ref: Some(UnitId("u-tCO2e".into())),
            value: FactValue::Numeric {
                literal: d("120.500"),
                decimals: 3,
                scale: 0,
            },
        };
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["value"]["numeric"]["literal"], "120.500");
        let back: Fact = serde_json::from_value(json).unwrap();
        assert_eq!(back, fact);
    }
}
