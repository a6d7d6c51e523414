//! Derived views over the record set.
//!
//! Everything here is computed from employees and records on demand; the
//! stored `salary` of each record is summed as-is and never recomputed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Employee, Payout, PendingSettlement, UnpaidBalance, WorkRecord};
use crate::settlement::{last_payout, unpaid_records_for};

/// Sum of every unpaid salary.
pub fn total_unpaid(records: &[WorkRecord]) -> Decimal {
    records.iter().filter(|r| !r.paid).map(|r| r.salary).sum()
}

/// Sum of one employee's unpaid salaries.
pub fn unpaid_by_employee(records: &[WorkRecord], employee_id: Uuid) -> Decimal {
    unpaid_records_for(records, employee_id)
        .map(|r| r.salary)
        .sum()
}

/// Per-employee unpaid totals, in employee order. Zero balances are omitted.
pub fn unpaid_balances(employees: &[Employee], records: &[WorkRecord]) -> Vec<UnpaidBalance> {
    employees
        .iter()
        .filter_map(|emp| {
            let amount = unpaid_by_employee(records, emp.id);
            (!amount.is_zero()).then(|| UnpaidBalance {
                employee_id: emp.id,
                employee_name: emp.name.clone(),
                amount,
            })
        })
        .collect()
}

/// The most recent payout of every employee that has ever been paid.
///
/// Sorted by payout timestamp, newest first. Employees with equal
/// timestamps keep their relative order.
pub fn last_payouts(employees: &[Employee], records: &[WorkRecord]) -> Vec<Payout> {
    let mut payouts: Vec<Payout> = employees
        .iter()
        .filter_map(|emp| {
            let batch = last_payout(records, emp.id)?;
            Some(Payout {
                employee_id: emp.id,
                employee_name: emp.name.clone(),
                paid_at: batch.paid_at,
                amount: batch.amount(),
                record_ids: batch.record_ids(),
            })
        })
        .collect();

    payouts.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
    payouts
}

/// Unpaid work grouped per employee, for the settlement screen.
///
/// Employees without unpaid records are omitted.
pub fn pending_settlements(
    employees: &[Employee],
    records: &[WorkRecord],
) -> Vec<PendingSettlement> {
    employees
        .iter()
        .filter_map(|emp| {
            let pending: Vec<WorkRecord> = unpaid_records_for(records, emp.id).cloned().collect();
            if pending.is_empty() {
                return None;
            }
            let total = pending.iter().map(|r| r.salary).sum();
            Some(PendingSettlement {
                employee_id: emp.id,
                employee_name: emp.name.clone(),
                records: pending,
                total,
            })
        })
        .collect()
}

/// Optional filters for [`history`]. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Only records of this employee.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Only records on or after this date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Only records on or before this date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl HistoryFilter {
    /// Returns true if the record passes every filter that is set.
    pub fn matches(&self, record: &WorkRecord) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.start_date.is_none_or(|start| record.date >= start)
            && self.end_date.is_none_or(|end| record.date <= end)
    }
}

/// Filtered work history, newest date first.
///
/// Records on the same date keep their store order.
pub fn history<'a>(records: &'a [WorkRecord], filter: &HistoryFilter) -> Vec<&'a WorkRecord> {
    let mut matching: Vec<&WorkRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}

/// Looks up an employee's name, if the employee still exists.
pub fn employee_name(employees: &[Employee], employee_id: Uuid) -> Option<&str> {
    employees
        .iter()
        .find(|e| e.id == employee_id)
        .map(|e| e.name.as_str())
}
