//! # Reporting Identity and Registry Identifiers
//!
//! `ReportingEntity` identifies the undertaking a filing reports on.
//! `ContextId` and `UnitId` are the registry keys facts point at. Both ids
//! are derived from structure, never allocated from a counter, so the same
//! period or unit always yields the same id across runs and processes.
//!
//! Separate newtypes keep a context id from being passed where a unit id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::period::Period;
use crate::unit::Unit;

/// Identifier scheme for ISO 17442 Legal Entity Identifiers.
pub const LEI_SCHEME: &str = "http://standards.iso.org/iso/17442";

/// The entity a document reports on: an identifier within a scheme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportingEntity {
    /// Identifier value, e.g. an LEI code.
    pub identifier: String,
    /// Identifier scheme URI.
    pub scheme: String,
}

impl ReportingEntity {
    /// Build an entity from an arbitrary scheme.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyEntityField`] when either part is blank.
    pub fn new(identifier: &str, scheme: &str) -> Result<Self, CoreError> {
        if identifier.trim().is_empty() {
            return Err(CoreError::EmptyEntityField { field: "identifier" });
        }
        if scheme.trim().is_empty() {
            return Err(CoreError::EmptyEntityField { field: "scheme" });
        }
        Ok(Self {
            identifier: identifier.to_string(),
            scheme: scheme.to_string(),
        })
    }

    /// Build an entity identified by a Legal Entity Identifier.
    ///
    /// Validates the ISO 17442 shape (18 alphanumeric characters followed by
    /// two check digits) and the ISO 7064 MOD 97-10 checksum.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidLei`] when the code is malformed or the check
    /// digits do not verify.
    pub fn lei(code: &str) -> Result<Self, CoreError> {
        validate_lei(code)?;
        Ok(Self {
            identifier: code.to_string(),
            scheme: LEI_SCHEME.to_string(),
        })
    }

    /// Whether this entity is identified by an LEI.
    pub fn is_lei(&self) -> bool {
        self.scheme == LEI_SCHEME
    }
}

impl fmt::Display for ReportingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.scheme, self.identifier)
    }
}

fn validate_lei(code: &str) -> Result<(), CoreError> {
    let reject = |reason: &str| CoreError::InvalidLei {
        code: code.to_string(),
        reason: reason.to_string(),
    };

    if code.len() != 20 {
        return Err(reject("must be exactly 20 characters"));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err(reject("must contain only digits and uppercase letters"));
    }
    if !code[18..].chars().all(|c| c.is_ascii_digit()) {
        return Err(reject("check digits must be numeric"));
    }

    // ISO 7064 MOD 97-10: letters expand to two digits (A=10 .. Z=35).
    let mut remainder: u32 = 0;
    for c in code.chars() {
        let value = c.to_digit(36).unwrap_or(0);
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    if remainder != 1 {
        return Err(reject("check digits do not verify"));
    }
    Ok(())
}

/// Registry key of a context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub String);

impl ContextId {
    /// Derive the id of the context for `period`.
    ///
    /// `c-instant-<date>` for instants, `c-duration-<start>-<end>` for
    /// durations. The entity is not part of the id: a document has exactly
    /// one entity.
    pub fn for_period(period: &Period) -> Self {
        match period {
            Period::Instant(date) => Self(format!("c-instant-{date}")),
            Period::Duration { start, end } => Self(format!("c-duration-{start}-{end}")),
        }
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry key of a unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    /// Derive the id of `unit`: `u-<local>` for simple units,
    /// `u-<numerator>-per-<denominator>` for ratios.
    pub fn for_unit(unit: &Unit) -> Self {
        match unit {
            Unit::Simple(measure) => Self(format!("u-{}", measure.local())),
            Unit::Ratio {
                numerator,
                denominator,
            } => Self(format!(
                "u-{}-per-{}",
                numerator.local(),
                denominator.local()
            )),
        }
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
