//! Settlement and balance views.
//!
//! These types are derived from the stored records; none of them is
//! persisted on its own.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WorkRecord;

/// One payment event: every record of an employee stamped with the same `paid_at`.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::Payout;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let payout = Payout {
///     employee_id: Uuid::new_v4(),
///     employee_name: "Ana".to_string(),
///     paid_at: Utc::now(),
///     amount: Decimal::new(16000, 2),
///     record_ids: vec![Uuid::new_v4()],
/// };
/// assert_eq!(payout.record_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    /// The employee who was paid.
    pub employee_id: Uuid,
    /// The employee's name at the time of reporting.
    pub employee_name: String,
    /// The shared settlement timestamp of the batch.
    pub paid_at: DateTime<Utc>,
    /// Sum of the batch's salaries.
    pub amount: Decimal,
    /// The records in the batch, in store order.
    pub record_ids: Vec<Uuid>,
}

impl Payout {
    /// Number of records in the batch.
    pub fn record_count(&self) -> usize {
        self.record_ids.len()
    }
}

/// Outstanding amount owed to one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaidBalance {
    /// The employee owed.
    pub employee_id: Uuid,
    /// The employee's name.
    pub employee_name: String,
    /// Sum of unpaid salaries.
    pub amount: Decimal,
}

/// Everything waiting to be settled for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSettlement {
    /// The employee owed.
    pub employee_id: Uuid,
    /// The employee's name.
    pub employee_name: String,
    /// The unpaid records, in store order.
    pub records: Vec<WorkRecord>,
    /// Sum of their salaries.
    pub total: Decimal,
}
