//! # Context and Unit Registry
//!
//! Interns the contexts and units facts refer to. Ids are derived from
//! structure (see [`ContextId::for_period`], [`UnitId::for_unit`]), so
//! interning equal input twice returns the same id and leaves one entry.
//!
//! A registry belongs to one document build and is never shared across
//! builds. It is bound to one reporting entity; a context for any other
//! entity is refused.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use esrs_core::{ContextId, Period, ReportingEntity, Unit, UnitId};

use crate::error::RegistryError;

/// An (entity, period) pair facts are reported against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Registry id.
    pub id: ContextId,
    /// The reporting entity.
    pub entity: ReportingEntity,
    /// The period.
    pub period: Period,
}

/// Interned contexts and units of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub(crate) entity: ReportingEntity,
    pub(crate) contexts: BTreeMap<ContextId, Context>,
    pub(crate) units: BTreeMap<UnitId, Unit>,
}

impl Registry {
    /// An empty registry bound to `entity`.
    pub fn new(entity: ReportingEntity) -> Self {
        Self {
            entity,
            contexts: BTreeMap::new(),
            units: BTreeMap::new(),
        }
    }

    /// The entity every context must report on.
    pub fn entity(&self) -> &ReportingEntity {
        &self.entity
    }

    /// Intern the context for (`entity`, `period`).
    ///
    /// # Errors
    ///
    /// [`RegistryError::MultiEntity`] when `entity` is not the registry's
    /// entity.
    pub fn intern_context(
        &mut self,
        entity: &ReportingEntity,
        period: Period,
    ) -> Result<ContextId, RegistryError> {
        let id = ContextId::for_period(&period);
        if *entity != self.entity {
            return Err(RegistryError::MultiEntity {
                context: id,
                expected: self.entity.clone(),
                found: entity.clone(),
            });
        }
        self.contexts.entry(id.clone()).or_insert_with(|| Context {
            id: id.clone(),
            entity: entity.clone(),
            period,
        });
        Ok(id)
    }

    /// Intern `unit`.
    ///
    /// Distinct units whose derived ids collide (same local names under
    /// different prefixes) get a numeric suffix in interning order.
    pub fn intern_unit(&mut self, unit: Unit) -> UnitId {
        let base = UnitId::for_unit(&unit);
        let mut id = base.clone();
        let mut n = 1;
        loop {
            match self.units.get(&id) {
                Some(existing) if *existing == unit => return id,
                Some(_) => {
                    n += 1;
                    id = UnitId(format!("{base}-{n}"));
                }
                None => {
                    self.units.insert(id.clone(), unit);
                    return id;
                }
            }
        }
    }

    /// Look up a context.
    pub fn context(&self, id: &ContextId) -> Option<&Context> {
        self.contexts.get(id)
    }

    /// Look up a unit.
    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// All contexts, sorted by id.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    /// All units with their ids, sorted by id.
    pub fn units(&self) -> impl Iterator<Item = (&UnitId, &Unit)> {
        self.units.iter()
    }

    /// Number of contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn entity() -> ReportingEntity {
        ReportingEntity::lei("529900T8BM49AURSDO55").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fy2024() -> Period {
        Period::duration(date(2024, 1, 1), date(2024, 12, 31)).unwrap()
    }

    #[test]
    fn test_context_dedup() {
        let mut reg = Registry::new(entity());
        let a = reg.intern_context(&entity(), fy2024()).unwrap();
        let b = reg.intern_context(&entity(), fy2024()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "c-duration-2024-01-01-2024-12-31");
        assert_eq!(reg.context_count(), 1);
    }

    #[test]
    fn test_instant_and_duration_are_distinct() {
        let mut reg = Registry::new(entity());
        reg.intern_context(&entity(), fy2024()).unwrap();
        let instant = reg
            .intern_context(&entity(), Period::instant(date(2024, 12, 31)))
            .unwrap();
        assert_eq!(instant.as_str(), "c-instant-2024-12-31");
        assert_eq!(reg.context_count(), 2);
    }

    #[test]
    fn test_foreign_entity_rejected() {
        let mut reg = Registry::new(entity());
        let other = ReportingEntity::lei("7LTWFZYICNSX8D621K86").unwrap();
        let err = reg.intern_context(&other, fy2024()).unwrap_err();
        assert!(matches!(err, RegistryError::MultiEntity { .. }));
        assert_eq!(reg.context_count(), 0);
    }

    #[test]
    fn test_unit_dedup() {
        let mut reg = Registry::new(entity());
        let a = reg.intern_unit(Unit::simple("utr:tCO2e").unwrap());
        let b = reg.intern_unit(Unit::simple("utr:tCO2e").unwrap());
        assert_eq!(a, b);
        assert_eq!(reg.unit_count(), 1);
        assert_eq!(reg.unit(&a), Some(&Unit::simple("utr:tCO2e").unwrap()));
    }

    #[test]
    fn test_colliding_unit_ids_disambiguated() {
        let mut reg = Registry::new(entity());
        let a = reg.intern_unit(Unit::simple("utr:pure").unwrap());
        let b = reg.intern_unit(Unit::pure());
        assert_ne!(a, b);
        assert_eq!(b.0, format!("{a}-2"));
        assert_eq!(reg.intern_unit(Unit::pure()), b);
    }

    #[test]
    fn test_ratio_unit_id() {
        let mut reg = Registry::new(entity());
        let id = reg.intern_unit(Unit::ratio("utr:tCO2e", "iso4217:EUR").unwrap());
        assert_eq!(id.as_str(), "u-tCO2e-per-EUR");
    }

    proptest! {
        #[test]
        fn prop_interning_is_idempotent(
            days in proptest::collection::vec((0i64..3650, 0i64..400), 1..30)
        ) {
            let mut reg = Registry::new(entity());
            let base = date(2015, 1, 1);
            let mut distinct = std::collections::BTreeSet::new();
            for (offset, len) in days {
                let start = base + chrono::Duration::days(offset);
                let end = start + chrono::Duration::days(len);
                let period = Period::duration(start, end).unwrap();
                let first = reg.intern_context(&entity(), period).unwrap();
                let second = reg.intern_context(&entity(), period).unwrap();
                prop_assert_eq!(&first, &second);
                distinct.insert(period);
            }
            prop_assert_eq!(reg.context_count(), distinct.len());
        }

        #[test]
        fn prop_unit_interning_is_idempotent(codes in proptest::collection::vec("[A-Z]{3}", 1..20)) {
            let mut reg = Registry::new(entity());
            let mut distinct = std::collections::BTreeSet::new();
            for code in codes {
                let unit = Unit::currency(&code).unwrap();
                let a = reg.intern_unit(unit.clone());
                let b = reg.intern_unit(unit);
                prop_assert_eq!(a, b);
                distinct.insert(code);
            }
            prop_assert_eq!(reg.unit_count(), distinct.len());
        }
    }
}
