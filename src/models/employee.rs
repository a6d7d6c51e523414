//! Employee model and related types.
//!
//! This module defines the Employee struct and the patch type used to
//! rename an employee or change their hourly rate override.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a worker whose hours and pieces are recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable identifier assigned by the store at creation.
    pub id: Uuid,
    /// Display name; never empty.
    pub name: String,
    /// Optional override for the system-wide default hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

impl Employee {
    /// Returns true if the employee carries their own hourly rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_ledger::models::Employee;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let ana = Employee {
    ///     id: Uuid::new_v4(),
    ///     name: "Ana".to_string(),
    ///     hourly_rate: Some(Decimal::new(2500, 2)),
    /// };
    /// assert!(ana.has_rate_override());
    /// ```
    pub fn has_rate_override(&self) -> bool {
        self.hourly_rate.is_some()
    }
}

/// A partial update to an employee. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New hourly rate override.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Drops the override so the system default applies again.
    /// Takes precedence over `hourly_rate`.
    #[serde(default)]
    pub clear_hourly_rate: bool,
}

impl EmployeePatch {
    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.hourly_rate.is_none() && !self.clear_hourly_rate
    }

    /// Applies the patch to an employee in place.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if self.clear_hourly_rate {
            employee.hourly_rate = None;
        } else if let Some(rate) = self.hourly_rate {
            employee.hourly_rate = Some(rate);
        }
    }
}
