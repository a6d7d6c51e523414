//! Input types for the ledger's write workflows and their validation.
//!
//! Everything in this module runs before the store is touched, so a
//! rejected input never leaves partial state behind.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{checked_amount, hours_between};
use crate::error::{EngineError, EngineResult};
use crate::models::WorkKind;

/// How the hours of a work entry were given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursInput {
    /// A number of hours typed in directly.
    Explicit(Decimal),
    /// A clock-time span; an end before the start crosses midnight.
    Span {
        /// Start of work.
        start: NaiveTime,
        /// End of work.
        end: NaiveTime,
    },
}

impl HoursInput {
    /// Resolves the input into a non-negative number of hours.
    ///
    /// A span with equal start and end has no duration and is rejected
    /// rather than recorded as zero hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_ledger::ledger::HoursInput;
    /// use chrono::NaiveTime;
    /// use rust_decimal::Decimal;
    ///
    /// let night = HoursInput::Span {
    ///     start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
    /// };
    /// assert_eq!(night.resolve().unwrap(), Decimal::from(4));
    /// ```
    pub fn resolve(self) -> EngineResult<Decimal> {
        match self {
            HoursInput::Explicit(hours) => checked_amount("hours", hours),
            HoursInput::Span { start, end } => hours_between(start, end).ok_or_else(|| {
                EngineError::validation("end_time", "end time must differ from start time")
            }),
        }
    }
}

/// A new unit of work to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkEntry {
    /// The employee who did the work.
    pub employee_id: Uuid,
    /// Calendar date of the work.
    pub date: NaiveDate,
    /// Hours worked, if any.
    pub hours: Option<HoursInput>,
    /// Pieces completed.
    pub strings: Decimal,
}

/// A partial edit of an existing record.
///
/// When `salary` is given it is stored as-is. Otherwise a change to hours
/// or strings recomputes the salary with the rates in effect at the time
/// of the edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New hours.
    pub hours: Option<HoursInput>,
    /// New piece count.
    pub strings: Option<Decimal>,
    /// Explicit salary override.
    pub salary: Option<Decimal>,
}

pub(crate) fn employee_name(name: &str) -> EngineResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Checks that a record represents some work.
pub(crate) fn work_kind(hours: Decimal, strings: Decimal) -> EngineResult<WorkKind> {
    WorkKind::classify(hours, strings)
        .ok_or_else(|| EngineError::validation("hours", "either hours or strings must be provided"))
}
