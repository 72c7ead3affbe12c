//! # Fact Encoder
//!
//! Turns a raw report value into a [`Fact`]. The concept's kind selects a
//! fixed policy for `(decimals, scale)`:
//!
//! | Kind | scale | decimals | domain |
//! |------|-------|----------|--------|
//! | Monetary | 0, or a multiple of 3 above the scaling threshold | 2 | any sign |
//! | Mass, Energy, Volume | 0 | 0 if whole, else `fractional_decimals` | `>= 0` |
//! | Percentage | 0 | reported fraction digits, else `percentage_precision` | `0..=100` |
//! | Intensity | 0 | reported fraction digits, else `intensity_precision` | `>= 0` |
//! | Count | 0 | 0 | whole, `>= 0` |
//! | Text | n/a | n/a | non-blank |
//! | Date | n/a | n/a | `YYYY-MM-DD` |
//!
//! ## Reconstruction bound
//!
//! The literal is `round(raw / 10^scale, decimals)` (half away from zero),
//! so `|literal × 10^scale − raw| <= 10^(scale − decimals)`.
//!
//! Values outside a kind's domain are rejected with
//! [`EncodeError::Domain`], never clamped.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use esrs_core::{Period, ReportingEntity};
use esrs_taxonomy::{Catalog, Concept, ConceptKind, PeriodType};

use crate::error::EncodeError;
use crate::fact::{apply_scale, Fact, FactValue};
use crate::policy::{GenerationPolicy, MonetaryScaling};
use crate::registry::Registry;
use crate::report::RawValue;

/// Decimals used for monetary amounts.
pub const MONETARY_DECIMALS: i8 = 2;

/// Encodes report values for one document.
#[derive(Debug)]
pub struct FactEncoder<'a> {
    catalog: &'a Catalog,
    policy: &'a GenerationPolicy,
    currency: &'a str,
    entity: &'a ReportingEntity,
    period: Period,
}

impl<'a> FactEncoder<'a> {
    /// An encoder for facts of `entity` over the duration `period`.
    ///
    /// Instant concepts are reported at the period's last day.
    pub fn new(
        catalog: &'a Catalog,
        policy: &'a GenerationPolicy,
        currency: &'a str,
        entity: &'a ReportingEntity,
        period: Period,
    ) -> Self {
        Self {
            catalog,
            policy,
            currency,
            entity,
            period,
        }
    }

    /// Encode `raw` for `field`, interning its context and unit.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::Catalog`] when `field` is unmapped.
    /// - [`EncodeError::Domain`] when `raw` is outside the concept's domain.
    /// - [`EncodeError::Registry`] when the context cannot be interned.
    pub fn encode(
        &self,
        field: &str,
        raw: &RawValue,
        registry: &mut Registry,
    ) -> Result<Fact, EncodeError> {
        let concept = self.catalog.lookup(field)?;
        self.encode_concept(concept, raw, registry)
    }

    /// Encode `raw` for an already resolved concept.
    pub fn encode_concept(
        &self,
        concept: &Concept,
        raw: &RawValue,
        registry: &mut Registry,
    ) -> Result<Fact, EncodeError> {
        let value = encode_value(concept, raw, self.policy)?;

        let period = match concept.period_type {
            PeriodType::Duration => self.period,
            PeriodType::Instant => Period::instant(self.period.end()),
        };
        let context_ref = registry.intern_context(self.entity, period)?;

        let unit_ref = match concept.unit(self.currency)? {
            Some(unit) if value.is_numeric() => Some(registry.intern_unit(unit)),
            _ => None,
        };

        tracing::trace!(
            concept = %concept.qname,
            context = %context_ref,
            "encoded fact"
        );

        Ok(Fact {
            concept: concept.qname.clone(),
            context_ref,
            unit_ref,
            value,
        })
    }
}

/// Apply the kind policy to `raw`. Pure: no registry, no context.
///
/// # Errors
///
/// [`EncodeError::Domain`] when `raw` is outside the concept's domain.
pub fn encode_value(
    concept: &Concept,
    raw: &RawValue,
    policy: &GenerationPolicy,
) -> Result<FactValue, EncodeError> {
    let domain = |reason: &str| EncodeError::Domain {
        field: concept.field.to_string(),
        kind: concept.kind,
        value: raw.display(),
        reason: reason.to_string(),
    };

    let number = || match raw {
        RawValue::Number(n) => Ok(*n),
        RawValue::Text(t) => Decimal::from_str(t).map_err(|_| domain("expected a number")),
    };
    let tag = |v: Decimal, decimals: i8, scale: i8| {
        numeric(v, decimals, scale).ok_or_else(|| domain("not representable at this scale"))
    };

    match concept.kind {
        ConceptKind::Text => {
            let text = raw.display();
            if text.trim().is_empty() {
                return Err(domain("text must not be blank"));
            }
            Ok(FactValue::NonNumeric(text))
        }
        ConceptKind::Date => match raw {
            RawValue::Text(t) if NaiveDate::parse_from_str(t, "%Y-%m-%d").is_ok() => {
                Ok(FactValue::NonNumeric(t.clone()))
            }
            _ => Err(domain("expected a date in YYYY-MM-DD form")),
        },
        ConceptKind::Monetary => {
            let v = number()?;
            let scale = monetary_scale(v, policy.monetary_scaling);
            tag(v, MONETARY_DECIMALS, scale)
        }
        ConceptKind::Mass | ConceptKind::Energy | ConceptKind::Volume => {
            let v = number()?;
            if v.is_sign_negative() && !v.is_zero() {
                return Err(domain("must not be negative"));
            }
            let decimals = if v.fract().is_zero() {
                0
            } else {
                policy.fractional_decimals as i8
            };
            tag(v, decimals, 0)
        }
        ConceptKind::Percentage => {
            let v = number()?;
            if v < Decimal::ZERO || v > Decimal::ONE_HUNDRED {
                return Err(domain("must be between 0 and 100"));
            }
            tag(v, reported_precision(v, policy.percentage_precision), 0)
        }
        ConceptKind::Intensity => {
            let v = number()?;
            if v.is_sign_negative() && !v.is_zero() {
                return Err(domain("must not be negative"));
            }
            tag(v, reported_precision(v, policy.intensity_precision), 0)
        }
        ConceptKind::Count => {
            let v = number()?;
            if v.is_sign_negative() && !v.is_zero() {
                return Err(domain("must not be negative"));
            }
            if !v.fract().is_zero() {
                return Err(domain("must be a whole number"));
            }
            tag(v, 0, 0)
        }
    }
}

/// Fraction digits as reported, or `default` when the value has none.
fn reported_precision(v: Decimal, default: u8) -> i8 {
    let reported = v.scale().min(u32::from(crate::policy::MAX_PRECISION));
    if reported > 0 {
        reported as i8
    } else {
        default as i8
    }
}

/// The scale for a monetary amount under `scaling`.
pub fn monetary_scale(v: Decimal, scaling: MonetaryScaling) -> i8 {
    match scaling {
        MonetaryScaling::Fixed { unit } => unit.exponent(),
        MonetaryScaling::Auto { threshold } => {
            let magnitude = v.abs();
            if magnitude <= threshold {
                return 0;
            }
            let digits = integer_digits(magnitude);
            (3 * ((digits.saturating_sub(1)) / 3)) as i8
        }
    }
}

/// Number of digits in the integer part (at least 1).
fn integer_digits(v: Decimal) -> u32 {
    let mut int = v.trunc().abs();
    let mut digits = 1;
    while int >= Decimal::TEN {
        int = (int / Decimal::TEN).trunc();
        digits += 1;
    }
    digits
}

/// `round(v / 10^scale, decimals)`, padded to exactly `decimals` digits.
fn numeric(v: Decimal, decimals: i8, scale: i8) -> Option<FactValue> {
    let scaled = apply_scale(v, scale.checked_neg()?)?;
    let dp = decimals.max(0) as u32;
    let mut literal = scaled.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    literal.rescale(dp);
    Some(FactValue::Numeric {
        literal,
        decimals,
        scale,
    })
}
