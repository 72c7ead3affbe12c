//! # Units of Measure
//!
//! A `Unit` is a single measure (`utr:tCO2e`, `iso4217:EUR`, `xbrli:pure`) or
//! a ratio of two measures (`utr:tCO2e` per `iso4217:EUR`). Units compare by
//! structure, which is what the registry deduplicates on.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::qname::QName;

/// A unit of measure for numeric facts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// A single measure.
    Simple(QName),
    /// `numerator / denominator`.
    Ratio {
        /// Numerator measure.
        numerator: QName,
        /// Denominator measure.
        denominator: QName,
    },
}

impl Unit {
    /// Parse a simple unit from a measure name such as `"iso4217:EUR"`.
    pub fn simple(measure: &str) -> Result<Self, CoreError> {
        Ok(Self::Simple(measure.parse()?))
    }

    /// Parse a ratio unit from two measure names.
    pub fn ratio(numerator: &str, denominator: &str) -> Result<Self, CoreError> {
        Ok(Self::Ratio {
            numerator: numerator.parse()?,
            denominator: denominator.parse()?,
        })
    }

    /// The dimensionless unit `xbrli:pure`.
    pub fn pure() -> Self {
        Self::Simple(QName::known("xbrli", "pure"))
    }

    /// A currency unit for an ISO 4217 code.
    pub fn currency(code: &str) -> Result<Self, CoreError> {
        Ok(Self::Simple(QName::new("iso4217", code)?))
    }

    /// Short human label, e.g. `tCO2e` or `tCO2e/EUR`.
    pub fn label(&self) -> String {
        match self {
            Self::Simple(m) => m.local().to_string(),
            Self::Ratio {
                numerator,
                denominator,
            } => format!("{}/{}", numerator.local(), denominator.local()),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(m) => write!(f, "{m}"),
            Self::Ratio {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Unit::simple("utr:tCO2e").unwrap(), Unit::simple("utr:tCO2e").unwrap());
        assert_ne!(Unit::simple("utr:t").unwrap(), Unit::simple("utr:tCO2e").unwrap());
    }

    #[test]
    fn test_pure_and_currency() {
        assert_eq!(Unit::pure().to_string(), "xbrli:pure");
        assert_eq!(Unit::currency("EUR").unwrap().to_string(), "iso4217:EUR");
        assert!(Unit::currency("eur lower").is_err());
    }

    #[test]
    fn test_ratio_label() {
        let u = Unit::ratio("utr:MWh", "iso4217:EUR").unwrap();
        assert_eq!(u.label(), "MWh/EUR");
        assert_eq!(u.to_string(), "utr:MWh/iso4217:EUR");
    }

    #[test]
    fn test_unknown_measure_prefix_rejected() {
        assert!(Unit::simple("acme:widgets").is_err());
    }
}
