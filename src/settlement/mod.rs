//! Settlement batch logic.
//!
//! A settlement flips every unpaid record of one employee to paid, stamping
//! all of them with the same timestamp. That shared `paid_at` is the only
//! thing tying the records of one payout together, so a batch must always be
//! applied as a whole; [`last_payout`] relies on exact timestamp equality to
//! rebuild it.
//!
//! The functions here are pure and operate on record slices. The store
//! performs the durable update in one request and the ledger then calls
//! [`apply_settlement`] to bring its cache in line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::WorkRecord;

/// The records making up one payout event.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutBatch<'a> {
    /// The timestamp shared by every record in the batch.
    pub paid_at: DateTime<Utc>,
    /// The records in the batch, in store order.
    pub records: Vec<&'a WorkRecord>,
}

impl PayoutBatch<'_> {
    /// Sum of the batch's salaries.
    pub fn amount(&self) -> Decimal {
        self.records.iter().map(|r| r.salary).sum()
    }

    /// Ids of the records in the batch.
    pub fn record_ids(&self) -> Vec<Uuid> {
        self.records.iter().map(|r| r.id).collect()
    }
}

/// Returns the unpaid records of one employee, in store order.
pub fn unpaid_records_for(
    records: &[WorkRecord],
    employee_id: Uuid,
) -> impl Iterator<Item = &WorkRecord> {
    records
        .iter()
        .filter(move |r| r.employee_id == employee_id && !r.paid)
}

/// Marks every unpaid record of `employee_id` as paid at `now`.
///
/// Returns the ids of the records that changed. Records that were already
/// paid keep their original `paid_at`.
pub fn apply_settlement(
    records: &mut [WorkRecord],
    employee_id: Uuid,
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    records
        .iter_mut()
        .filter(|r| r.employee_id == employee_id && !r.paid)
        .map(|r| {
            r.paid = true;
            r.paid_at = Some(now);
            r.id
        })
        .collect()
}

/// Rebuilds the most recent payout batch of an employee.
///
/// Finds the latest `paid_at` among the employee's paid records and returns
/// every paid record carrying exactly that timestamp. Returns `None` when
/// the employee has never been paid.
///
/// # Examples
///
/// ```
/// use payroll_ledger::settlement::{apply_settlement, last_payout};
/// use payroll_ledger::models::WorkRecord;
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let employee_id = Uuid::new_v4();
/// let mut records = vec![WorkRecord {
///     id: Uuid::new_v4(),
///     employee_id,
///     date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     hours: Decimal::from(8),
///     strings: Decimal::ZERO,
///     salary: Decimal::from(160),
///     paid: false,
///     paid_at: None,
///     created_at: Utc::now(),
/// }];
///
/// assert!(last_payout(&records, employee_id).is_none());
///
/// let now = Utc::now();
/// apply_settlement(&mut records, employee_id, now);
///
/// let batch = last_payout(&records, employee_id).unwrap();
/// assert_eq!(batch.paid_at, now);
/// assert_eq!(batch.amount(), Decimal::from(160));
/// ```
pub fn last_payout(records: &[WorkRecord], employee_id: Uuid) -> Option<PayoutBatch<'_>> {
    let paid = || {
        records
            .iter()
            .filter(move |r| r.employee_id == employee_id && r.paid)
            .filter_map(|r| r.paid_at.map(|paid_at| (r, paid_at)))
    };

    let latest = paid().map(|(_, paid_at)| paid_at).max()?;
    let batch = paid()
        .filter(|(_, paid_at)| *paid_at == latest)
        .map(|(r, _)| r)
        .collect();

    Some(PayoutBatch {
        paid_at: latest,
        records: batch,
    })
}
