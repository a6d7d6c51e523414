//! Persistence for employees, work records and settings.
//!
//! The ledger talks to storage only through [`WorkRecordStore`]. Two
//! implementations exist: [`SqliteStore`] keeps data durably on disk and
//! [`MemoryStore`] keeps a local-only dataset for the lifetime of the
//! process. [`Backend`] picks one of them once at startup.

mod backend;
mod memory;
mod schema;
mod sqlite;

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Employee, EmployeePatch, RecordPatch, Settings, WorkRecord, WorkRecordDraft};

pub use backend::Backend;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// The storage interface the ledger depends on.
///
/// Every operation may fail with [`EngineError::StoreUnavailable`] or
/// [`EngineError::StoreOperationFailed`]. Implementations must make
/// [`settle_batch`](WorkRecordStore::settle_batch) and
/// [`delete_employee`](WorkRecordStore::delete_employee) atomic.
///
/// [`EngineError::StoreUnavailable`]: crate::error::EngineError::StoreUnavailable
/// [`EngineError::StoreOperationFailed`]: crate::error::EngineError::StoreOperationFailed
pub trait WorkRecordStore: Send + Sync {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// All employees, in creation order.
    fn list_employees(&self) -> impl Future<Output = EngineResult<Vec<Employee>>> + Send;

    /// Creates an employee with an optional hourly rate override.
    fn create_employee(
        &self,
        name: &str,
        hourly_rate: Option<Decimal>,
    ) -> impl Future<Output = EngineResult<Employee>> + Send;

    /// Applies a patch and returns the stored employee.
    fn update_employee(
        &self,
        id: Uuid,
        patch: &EmployeePatch,
    ) -> impl Future<Output = EngineResult<Employee>> + Send;

    /// Deletes an employee together with all of their work records.
    fn delete_employee(&self, id: Uuid) -> impl Future<Output = EngineResult<()>> + Send;

    /// All work records, in creation order.
    fn list_work_records(&self) -> impl Future<Output = EngineResult<Vec<WorkRecord>>> + Send;

    /// Stores a new, unpaid record; the store assigns `id` and `created_at`.
    fn create_work_record(
        &self,
        draft: &WorkRecordDraft,
    ) -> impl Future<Output = EngineResult<WorkRecord>> + Send;

    /// Applies a patch to a stored record.
    fn update_work_record(
        &self,
        id: Uuid,
        patch: &RecordPatch,
    ) -> impl Future<Output = EngineResult<()>> + Send;

    /// Deletes one record.
    fn delete_work_record(&self, id: Uuid) -> impl Future<Output = EngineResult<()>> + Send;

    /// Marks every unpaid record of the employee as paid at `now`, in one
    /// atomic request. Returns how many records changed.
    fn settle_batch(
        &self,
        employee_id: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = EngineResult<usize>> + Send;

    /// The stored settings, or the store's defaults if none were saved.
    fn get_settings(&self) -> impl Future<Output = EngineResult<Settings>> + Send;

    /// Replaces the stored settings.
    fn put_settings(&self, settings: &Settings) -> impl Future<Output = EngineResult<()>> + Send;
}
