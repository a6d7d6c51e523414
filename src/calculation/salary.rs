//! Salary calculation.
//!
//! This module turns hours, piece counts and resolved rates into an amount.
//! Every quantity the ledger accepts is capped at [`MAX_AMOUNT`], so the
//! products and the totals built from them stay well inside `Decimal`'s range.

use rust_decimal::Decimal;

use super::ResolvedRates;
use crate::error::{EngineError, EngineResult};

/// Largest hours, piece count, rate or salary the ledger accepts.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Computes `hours * hourly_rate + strings * unit_price`.
///
/// Hourly work, piece work and mixed days all go through the same linear
/// formula. Returns `None` if the result does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::compute_salary;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = compute_salary(
///     Decimal::from(8),
///     Decimal::from(40),
///     Decimal::from(20),
///     Decimal::from_str("0.25").unwrap(),
/// );
/// assert_eq!(amount, Some(Decimal::from(170)));
///
/// assert_eq!(compute_salary(Decimal::MAX, Decimal::ZERO, Decimal::from(2), Decimal::ONE), None);
/// ```
pub fn compute_salary(
    hours: Decimal,
    strings: Decimal,
    hourly_rate: Decimal,
    unit_price: Decimal,
) -> Option<Decimal> {
    hours
        .checked_mul(hourly_rate)?
        .checked_add(strings.checked_mul(unit_price)?)
}

/// Computes the salary for a day of work at the given resolved rates.
///
/// The result must itself be a valid amount.
pub fn salary_for(hours: Decimal, strings: Decimal, rates: &ResolvedRates) -> EngineResult<Decimal> {
    let salary = compute_salary(hours, strings, rates.hourly_rate, rates.unit_price)
        .ok_or_else(|| EngineError::validation("salary", format!("must not exceed {}", MAX_AMOUNT)))?;
    checked_amount("salary", salary)
}

/// Validates a quantity, rate or salary: `0 <= value <= MAX_AMOUNT`.
///
/// A negative zero is normalized to zero.
pub fn checked_amount(field: &str, value: Decimal) -> EngineResult<Decimal> {
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if value.is_sign_negative() {
        return Err(EngineError::validation(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(EngineError::validation(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(value)
}
