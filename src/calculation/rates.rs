//! Rate resolution.
//!
//! This module determines the hourly rate and piece price that apply to an
//! employee, either from their own override or from the system settings.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Employee, Settings};

/// Where a resolved hourly rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The employee's own hourly rate.
    EmployeeOverride,
    /// The system-wide default hourly rate.
    SystemDefault,
}

/// The rates in effect for one employee at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRates {
    /// The hourly rate to pay.
    pub hourly_rate: Decimal,
    /// The price per piece to pay.
    pub unit_price: Decimal,
    /// Where `hourly_rate` came from.
    pub source: RateSource,
}

/// Determines an employee's effective rates.
///
/// The hourly rate is the employee's override when present, otherwise
/// `settings.default_hourly_rate`. There is no per-employee piece price, so the
/// unit price is always `settings.default_unit_price`. An absent override is
/// the normal case, so this never fails.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::{resolve_rates, RateSource};
/// use payroll_ledger::models::{Employee, Settings};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: Uuid::new_v4(),
///     name: "Ana".to_string(),
///     hourly_rate: None,
/// };
/// let rates = resolve_rates(&employee, &Settings::default());
///
/// assert_eq!(rates.hourly_rate, Decimal::new(20, 0));
/// assert_eq!(rates.unit_price, Decimal::new(25, 2));
/// assert_eq!(rates.source, RateSource::SystemDefault);
/// ```
pub fn resolve_rates(employee: &Employee, settings: &Settings) -> ResolvedRates {
    match employee.hourly_rate {
        Some(override_rate) => ResolvedRates {
            hourly_rate: override_rate,
            unit_price: settings.default_unit_price,
            source: RateSource::EmployeeOverride,
        },
        None => ResolvedRates {
            hourly_rate: settings.default_hourly_rate,
            unit_price: settings.default_unit_price,
            source: RateSource::SystemDefault,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(override_rate: Option<Decimal>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            hourly_rate: override_rate,
        }
    }

    fn create_test_settings() -> Settings {
        Settings {
            default_hourly_rate: dec("20"),
            default_unit_price: dec("0.25"),
        }
    }

    #[test]
    fn test_default_rate_without_override() {
        let employee = create_test_employee(None);

        let rates = resolve_rates(&employee, &create_test_settings());

        assert_eq!(rates.hourly_rate, dec("20"));
        assert_eq!(rates.unit_price, dec("0.25"));
        assert_eq!(rates.source, RateSource::SystemDefault);
    }

    #[test]
    fn test_override_rate_takes_precedence() {
        let employee = create_test_employee(Some(dec("32.00")));

        let rates = resolve_rates(&employee, &create_test_settings());

        assert_eq!(rates.hourly_rate, dec("32.00"));
        assert_eq!(rates.source, RateSource::EmployeeOverride);
    }

    #[test]
    fn test_unit_price_ignores_override() {
        let employee = create_test_employee(Some(dec("32.00")));

        let rates = resolve_rates(&employee, &create_test_settings());

        assert_eq!(rates.unit_price, dec("0.25"));
    }

    #[test]
    fn test_zero_override_is_still_an_override() {
        let employee = create_test_employee(Some(Decimal::ZERO));

        let rates = resolve_rates(&employee, &create_test_settings());

        assert_eq!(rates.hourly_rate, Decimal::ZERO);
        assert_eq!(rates.source, RateSource::EmployeeOverride);
    }
}
