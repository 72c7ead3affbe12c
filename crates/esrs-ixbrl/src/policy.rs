//! # Generation Policy
//!
//! The tunable thresholds of fact encoding and validation. Defaults follow
//! common regulatory practice; a filer can override them from YAML:
//!
//! ```yaml
//! sum_tolerance: 0.005
//! monetary_scaling: { mode: fixed, unit: millions }
//! percentage_precision: 1
//! intensity_precision: 2
//! fractional_decimals: 3
//! ```
//!
//! Unknown keys are rejected so that a typo cannot silently fall back to a
//! default.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest `decimals` a policy may ask for.
pub const MAX_PRECISION: u8 = 12;

/// Encoding and validation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationPolicy {
    /// Largest accepted relative difference between a total and the sum of
    /// its components.
    pub sum_tolerance: Decimal,
    /// How monetary amounts are scaled.
    pub monetary_scaling: MonetaryScaling,
    /// `decimals` for percentages reported without fraction digits.
    pub percentage_precision: u8,
    /// `decimals` for intensities reported without fraction digits.
    pub intensity_precision: u8,
    /// `decimals` for mass, energy, and volume values with a fractional part.
    pub fractional_decimals: u8,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            sum_tolerance: Decimal::new(5, 3),
            monetary_scaling: MonetaryScaling::default(),
            percentage_precision: 1,
            intensity_precision: 2,
            fractional_decimals: 3,
        }
    }
}

/// Monetary scaling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MonetaryScaling {
    /// Amounts above `threshold` (in absolute value) are expressed in the
    /// largest power of a thousand that keeps a non-zero integer digit.
    Auto {
        /// Magnitude above which scaling applies.
        threshold: Decimal,
    },
    /// Every amount uses the same scale.
    Fixed {
        /// The scale unit.
        unit: ScaleUnit,
    },
}

impl Default for MonetaryScaling {
    fn default() -> Self {
        Self::Auto {
            threshold: Decimal::from(1_000_000),
        }
    }
}

/// A fixed power-of-a-thousand scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleUnit {
    /// Scale 0.
    Units,
    /// Scale 3.
    Thousands,
    /// Scale 6.
    Millions,
    /// Scale 9.
    Billions,
}

impl ScaleUnit {
    /// The `scale` attribute value.
    pub fn exponent(&self) -> i8 {
        match self {
            Self::Units => 0,
            Self::Thousands => 3,
            Self::Millions => 6,
            Self::Billions => 9,
        }
    }
}

impl GenerationPolicy {
    /// The "report in millions" policy.
    pub fn in_millions() -> Self {
        Self {
            monetary_scaling: MonetaryScaling::Fixed {
                unit: ScaleUnit::Millions,
            },
            ..Self::default()
        }
    }

    /// Parse and check a policy from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let policy: Self = serde_yaml::from_str(yaml)?;
        policy.check()?;
        Ok(policy)
    }

    /// Read, parse, and check a policy file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Reject out-of-range values.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.sum_tolerance.is_sign_negative() {
            return Err(ConfigError::Invalid {
                field: "sum_tolerance",
                reason: format!("{} is negative", self.sum_tolerance),
            });
        }
        if let MonetaryScaling::Auto { threshold } = self.monetary_scaling {
            if threshold.is_sign_negative() {
                return Err(ConfigError::Invalid {
                    field: "monetary_scaling.threshold",
                    reason: format!("{threshold} is negative"),
                });
            }
        }
        for (field, value) in [
            ("percentage_precision", self.percentage_precision),
            ("intensity_precision", self.intensity_precision),
            ("fractional_decimals", self.fractional_decimals),
        ] {
            if value > MAX_PRECISION {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} exceeds the maximum of {MAX_PRECISION}"),
                });
            }
        }
        Ok(())
    }
}
