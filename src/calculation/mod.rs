//! Calculation logic for the payroll ledger.
//!
//! This module contains the pure pay calculations: resolving the rates that
//! apply to an employee, converting clock-time spans into hours, and turning
//! hours and piece counts into a salary amount.

mod rates;
mod salary;
mod time_span;

pub use rates::{RateSource, ResolvedRates, resolve_rates};
pub use salary::{MAX_AMOUNT, checked_amount, compute_salary, salary_for};
pub use time_span::{hours_between, parse_clock_time};
