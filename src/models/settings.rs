//! System-wide rate settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::checked_amount;
use crate::error::EngineResult;

/// Default rates applied when an employee has no override.
///
/// Changing settings only affects records written afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Hourly rate for employees without an override.
    pub default_hourly_rate: Decimal,
    /// Price paid per piece.
    pub default_unit_price: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_hourly_rate: Decimal::new(20, 0),
            default_unit_price: Decimal::new(25, 2),
        }
    }
}

impl Settings {
    /// Checks both rates are within `0..=MAX_AMOUNT`, normalizing `-0`.
    pub fn validated(self) -> EngineResult<Self> {
        Ok(Self {
            default_hourly_rate: checked_amount("default_hourly_rate", self.default_hourly_rate)?,
            default_unit_price: checked_amount("default_unit_price", self.default_unit_price)?,
        })
    }
}
