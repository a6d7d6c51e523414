//! Clock-time span calculation.
//!
//! This module converts a start/end clock time pair into decimal hours,
//! treating an end time earlier than the start as the next day.

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Returns the hours between two clock times, rounded to 2 decimal places.
///
/// A negative difference means the span crosses midnight, so a day is added.
/// Equal times have no meaningful duration and yield `None`; callers must
/// treat that as "no value" rather than a zero-hour shift.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::hours_between;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
/// assert_eq!(hours_between(start, end), Some(Decimal::new(4, 0)));
/// assert_eq!(hours_between(start, start), None);
/// ```
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> Option<Decimal> {
    let mut seconds = (end - start).num_seconds();
    if seconds < 0 {
        seconds += SECONDS_PER_DAY;
    }
    if seconds <= 0 {
        return None;
    }

    let hours = Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR);
    Some(hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Parses an `HH:MM` clock time.
pub fn parse_clock_time(field: &str, value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        EngineError::validation(field, format!("'{}' is not a valid HH:MM time", value))
    })
}
