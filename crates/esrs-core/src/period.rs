//! # Reporting Periods
//!
//! A `Period` is either an instant (balance-style facts such as headcount at
//! year end) or a duration (flow facts such as annual emissions). Durations
//! satisfy `start <= end`; the only constructors enforce it, and
//! deserialization routes through the same check.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The period a context reports against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "PeriodRepr")]
pub enum Period {
    /// A point in time.
    Instant(NaiveDate),
    /// An inclusive date range.
    Duration {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },
}

impl Period {
    /// An instant period.
    pub fn instant(date: NaiveDate) -> Self {
        Self::Instant(date)
    }

    /// A duration period.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPeriod`] when `start > end`.
    pub fn duration(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidPeriod { start, end });
        }
        Ok(Self::Duration { start, end })
    }

    /// The last day covered by the period.
    pub fn end(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Duration { end, .. } => *end,
        }
    }

    /// Whether this is an instant period.
    pub fn is_instant(&self) -> bool {
        matches!(self, Self::Instant(_))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instant(date) => write!(f, "{date}"),
            Self::Duration { start, end } => write!(f, "{start}/{end}"),
        }
    }
}

/// Unchecked wire shape; converted through [`Period::duration`].
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum PeriodRepr {
    Instant(NaiveDate),
    Duration { start: NaiveDate, end: NaiveDate },
}

impl TryFrom<PeriodRepr> for Period {
    type Error = CoreError;

    fn try_from(repr: PeriodRepr) -> Result<Self, Self::Error> {
        match repr {
            PeriodRepr::Instant(date) => Ok(Self::Instant(date)),
            PeriodRepr::Duration { start, end } => Self::duration(start, end),
        }
    }
}
