//! The ledger: write workflows and the cached view of the store.
//!
//! [`Ledger`] owns a [`WorkRecordStore`] and an in-memory copy of its
//! employees, records and settings. Every mutation is validated first, then
//! sent to the store, and only applied to the cache once the store has
//! confirmed it, using the values the store returned.
//!
//! The ledger assumes a single writer. Callers that share one across tasks
//! must serialize access themselves.
//!
//! # Example
//!
//! ```
//! use payroll_ledger::ledger::{HoursInput, Ledger, WorkEntry};
//! use payroll_ledger::models::Settings;
//! use payroll_ledger::store::MemoryStore;
//! use chrono::{NaiveDate, Utc};
//! use rust_decimal::Decimal;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut ledger = Ledger::load(MemoryStore::new(Settings::default())).await?;
//! let ana = ledger.add_employee("Ana", None).await?;
//!
//! ledger
//!     .record_work(WorkEntry {
//!         employee_id: ana.id,
//!         date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         hours: Some(HoursInput::Explicit(Decimal::from(8))),
//!         strings: Decimal::ZERO,
//!     })
//!     .await?;
//!
//! let payout = ledger.settle(ana.id, Utc::now()).await?.unwrap();
//! assert_eq!(payout.amount, Decimal::from(160));
//! # Ok::<(), payroll_ledger::error::EngineError>(())
//! # }).unwrap();
//! ```

mod entry;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use entry::{HoursInput, RecordEdit, WorkEntry};

use crate::calculation::{ResolvedRates, checked_amount, resolve_rates, salary_for};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EmployeePatch, Payout, PendingSettlement, RecordPatch, Settings, UnpaidBalance,
    WorkRecord, WorkRecordDraft,
};
use crate::reporting::{self, HistoryFilter};
use crate::settlement::{apply_settlement, last_payout, unpaid_records_for};
use crate::store::WorkRecordStore;

use entry::{employee_name, work_kind};

/// Write orchestrator and read cache over a store.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    employees: Vec<Employee>,
    records: Vec<WorkRecord>,
    settings: Settings,
}

impl<S: WorkRecordStore> Ledger<S> {
    /// Loads everything from `store` into a new ledger.
    pub async fn load(store: S) -> EngineResult<Self> {
        let mut ledger = Self {
            store,
            employees: Vec::new(),
            records: Vec::new(),
            settings: Settings::default(),
        };
        ledger.refresh().await?;
        Ok(ledger)
    }

    /// Replaces the cache with a fresh copy of the store's contents.
    ///
    /// Records pointing at a missing employee are kept and logged.
    pub async fn refresh(&mut self) -> EngineResult<()> {
        let employees = self.store.list_employees().await?;
        let records = self.store.list_work_records().await?;
        let settings = self.store.get_settings().await?;

        for record in records
            .iter()
            .filter(|r| !employees.iter().any(|e| e.id == r.employee_id))
        {
            warn!(
                record_id = %record.id,
                employee_id = %record.employee_id,
                "Work record references a missing employee"
            );
        }

        info!(
            store = self.store.name(),
            employee_count = employees.len(),
            record_count = records.len(),
            "Ledger loaded"
        );

        self.employees = employees;
        self.records = records;
        self.settings = settings;
        Ok(())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All employees, in creation order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// All work records, in store order.
    pub fn records(&self) -> &[WorkRecord] {
        &self.records
    }

    /// The current rate settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Looks up an employee.
    pub fn employee(&self, id: Uuid) -> EngineResult<&Employee> {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .ok_or(EngineError::EmployeeNotFound { id })
    }

    /// Looks up a work record.
    pub fn record(&self, id: Uuid) -> EngineResult<&WorkRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(EngineError::RecordNotFound { id })
    }

    /// The rates currently in effect for an employee.
    pub fn rates_for(&self, employee_id: Uuid) -> EngineResult<ResolvedRates> {
        Ok(resolve_rates(self.employee(employee_id)?, &self.settings))
    }

    /// Adds an employee. `hourly_rate` of `None` follows the system default.
    pub async fn add_employee(
        &mut self,
        name: &str,
        hourly_rate: Option<Decimal>,
    ) -> EngineResult<Employee> {
        let name = employee_name(name)?;
        let hourly_rate = hourly_rate
            .map(|rate| checked_amount("hourly_rate", rate))
            .transpose()?;

        let employee = self.store.create_employee(&name, hourly_rate).await?;

        info!(employee_id = %employee.id, name = %employee.name, "Employee added");
        self.employees.push(employee.clone());
        Ok(employee)
    }

    /// Renames an employee, or sets or clears their rate override.
    ///
    /// Existing records keep their salary.
    pub async fn update_employee(
        &mut self,
        id: Uuid,
        patch: EmployeePatch,
    ) -> EngineResult<Employee> {
        self.employee(id)?;
        if patch.clear_hourly_rate && patch.hourly_rate.is_some() {
            return Err(EngineError::validation(
                "hourly_rate",
                "cannot set and clear the rate override together",
            ));
        }
        let patch = EmployeePatch {
            name: patch.name.as_deref().map(employee_name).transpose()?,
            hourly_rate: patch
                .hourly_rate
                .map(|rate| checked_amount("hourly_rate", rate))
                .transpose()?,
            clear_hourly_rate: patch.clear_hourly_rate,
        };

        let stored = self.store.update_employee(id, &patch).await?;

        info!(employee_id = %id, "Employee updated");
        if let Some(cached) = self.employees.iter_mut().find(|e| e.id == id) {
            *cached = stored.clone();
        }
        Ok(stored)
    }

    /// Deletes an employee and every record that references them.
    ///
    /// Returns the number of records removed.
    pub async fn remove_employee(&mut self, id: Uuid) -> EngineResult<usize> {
        self.employee(id)?;

        self.store.delete_employee(id).await?;

        let before = self.records.len();
        self.records.retain(|r| r.employee_id != id);
        self.employees.retain(|e| e.id != id);
        let removed = before - self.records.len();

        info!(employee_id = %id, record_count = removed, "Employee removed");
        Ok(removed)
    }

    /// Computes what an entry would pay, without recording anything.
    ///
    /// Returns the salary along with the rates it was computed from.
    pub fn preview_salary(
        &self,
        employee_id: Uuid,
        hours: Decimal,
        strings: Decimal,
    ) -> EngineResult<(Decimal, ResolvedRates)> {
        let hours = checked_amount("hours", hours)?;
        let strings = checked_amount("strings", strings)?;
        let rates = self.rates_for(employee_id)?;
        Ok((salary_for(hours, strings, &rates)?, rates))
    }

    /// Records a unit of work, freezing its salary at the current rates.
    pub async fn record_work(&mut self, entry: WorkEntry) -> EngineResult<WorkRecord> {
        let rates = self.rates_for(entry.employee_id)?;
        let hours = match entry.hours {
            Some(input) => input.resolve()?,
            None => Decimal::ZERO,
        };
        let strings = checked_amount("strings", entry.strings)?;
        let kind = work_kind(hours, strings)?;

        let draft = WorkRecordDraft {
            employee_id: entry.employee_id,
            date: entry.date,
            hours,
            strings,
            salary: salary_for(hours, strings, &rates)?,
        };
        let record = self.store.create_work_record(&draft).await?;

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            kind = kind.label(),
            salary = %record.salary,
            "Work recorded"
        );
        self.records.push(record.clone());
        Ok(record)
    }

    /// Edits a record. Paid status is never changed by an edit.
    pub async fn edit_record(&mut self, id: Uuid, edit: RecordEdit) -> EngineResult<WorkRecord> {
        let current = self.record(id)?.clone();

        let hours = edit.hours.map(HoursInput::resolve).transpose()?;
        let strings = edit
            .strings
            .map(|s| checked_amount("strings", s))
            .transpose()?;
        let new_hours = hours.unwrap_or(current.hours);
        let new_strings = strings.unwrap_or(current.strings);
        work_kind(new_hours, new_strings)?;

        let work_changed = new_hours != current.hours || new_strings != current.strings;
        let salary = match edit.salary {
            Some(salary) => Some(checked_amount("salary", salary)?),
            None if work_changed => {
                let rates = self.rates_for(current.employee_id)?;
                Some(salary_for(new_hours, new_strings, &rates)?)
            }
            None => None,
        };

        let patch = RecordPatch {
            date: edit.date,
            hours,
            strings,
            salary,
        };
        self.store.update_work_record(id, &patch).await?;

        let cached = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EngineError::RecordNotFound { id })?;
        patch.apply_to(cached);

        info!(record_id = %id, salary = %cached.salary, "Work record edited");
        Ok(cached.clone())
    }

    /// Deletes one record.
    pub async fn delete_record(&mut self, id: Uuid) -> EngineResult<()> {
        self.record(id)?;

        self.store.delete_work_record(id).await?;

        self.records.retain(|r| r.id != id);
        info!(record_id = %id, "Work record deleted");
        Ok(())
    }

    /// Pays out every unpaid record of an employee as one batch stamped `now`.
    ///
    /// Returns `None` without touching the store when nothing is unpaid.
    pub async fn settle(
        &mut self,
        employee_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<Option<Payout>> {
        let name = self.employee(employee_id)?.name.clone();
        let expected = unpaid_records_for(&self.records, employee_id).count();
        if expected == 0 {
            debug!(employee_id = %employee_id, "Nothing to settle");
            return Ok(None);
        }

        let changed = self.store.settle_batch(employee_id, now).await?;

        if changed != expected {
            warn!(
                employee_id = %employee_id,
                expected,
                changed,
                "Store settled a different number of records than cached, reloading"
            );
            self.refresh().await?;
            let batch = last_payout(&self.records, employee_id)
                .filter(|batch| batch.paid_at == now);
            return Ok(batch.map(|batch| Payout {
                employee_id,
                employee_name: name,
                paid_at: now,
                amount: batch.amount(),
                record_ids: batch.record_ids(),
            }));
        }

        let amount = reporting::unpaid_by_employee(&self.records, employee_id);
        let record_ids = apply_settlement(&mut self.records, employee_id, now);

        info!(
            employee_id = %employee_id,
            record_count = record_ids.len(),
            amount = %amount,
            paid_at = %now,
            "Employee settled"
        );
        Ok(Some(Payout {
            employee_id,
            employee_name: name,
            paid_at: now,
            amount,
            record_ids,
        }))
    }

    /// Replaces the default rates. Existing salaries are not recomputed.
    pub async fn update_settings(&mut self, settings: Settings) -> EngineResult<Settings> {
        let settings = settings.validated()?;

        self.store.put_settings(&settings).await?;

        info!(
            default_hourly_rate = %settings.default_hourly_rate,
            default_unit_price = %settings.default_unit_price,
            "Settings updated"
        );
        self.settings = settings;
        Ok(settings)
    }

    /// Sum of every unpaid salary.
    pub fn total_unpaid(&self) -> Decimal {
        reporting::total_unpaid(&self.records)
    }

    /// Per-employee unpaid totals, zero balances omitted.
    pub fn unpaid_balances(&self) -> Vec<UnpaidBalance> {
        reporting::unpaid_balances(&self.employees, &self.records)
    }

    /// The most recent payout of each employee, newest first.
    pub fn last_payouts(&self) -> Vec<Payout> {
        reporting::last_payouts(&self.employees, &self.records)
    }

    /// Unpaid work grouped per employee.
    pub fn pending_settlements(&self) -> Vec<PendingSettlement> {
        reporting::pending_settlements(&self.employees, &self.records)
    }

    /// Filtered records, newest date first.
    pub fn history(&self, filter: &HistoryFilter) -> Vec<&WorkRecord> {
        reporting::history(&self.records, filter)
    }

    /// The whole record set as CSV bytes.
    pub fn export_csv(&self) -> EngineResult<Vec<u8>> {
        reporting::to_csv_bytes(&self.records, &self.employees)
    }
}
