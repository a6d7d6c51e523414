//! Local-only in-memory store.
//!
//! Used when no durable store is configured or the configured one cannot be
//! opened. Nothing survives a restart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeePatch, RecordPatch, Settings, WorkRecord, WorkRecordDraft};

use super::WorkRecordStore;

#[derive(Debug, Default)]
struct Dataset {
    employees: Vec<Employee>,
    records: Vec<WorkRecord>,
    settings: Option<Settings>,
}

/// In-process store that keeps everything in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<Dataset>>,
    defaults: Settings,
}

impl MemoryStore {
    /// Creates an empty store that reports `defaults` until settings are saved.
    pub fn new(defaults: Settings) -> Self {
        Self {
            data: Arc::new(RwLock::new(Dataset::default())),
            defaults,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn missing(operation: &str, kind: &str, id: Uuid) -> EngineError {
    EngineError::store_failed(operation, format!("no {} with id {}", kind, id))
}

impl WorkRecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.data.read().await.employees.clone())
    }

    async fn create_employee(
        &self,
        name: &str,
        hourly_rate: Option<Decimal>,
    ) -> EngineResult<Employee> {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hourly_rate,
        };
        self.data.write().await.employees.push(employee.clone());
        Ok(employee)
    }

    async fn update_employee(&self, id: Uuid, patch: &EmployeePatch) -> EngineResult<Employee> {
        let mut data = self.data.write().await;
        let employee = data
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| missing("update_employee", "employee", id))?;
        patch.apply_to(employee);
        Ok(employee.clone())
    }

    async fn delete_employee(&self, id: Uuid) -> EngineResult<()> {
        let mut data = self.data.write().await;
        let before = data.employees.len();
        data.employees.retain(|e| e.id != id);
        if data.employees.len() == before {
            return Err(missing("delete_employee", "employee", id));
        }
        data.records.retain(|r| r.employee_id != id);
        Ok(())
    }

    async fn list_work_records(&self) -> EngineResult<Vec<WorkRecord>> {
        Ok(self.data.read().await.records.clone())
    }

    async fn create_work_record(&self, draft: &WorkRecordDraft) -> EngineResult<WorkRecord> {
        let mut data = self.data.write().await;
        if !data.employees.iter().any(|e| e.id == draft.employee_id) {
            return Err(missing("create_work_record", "employee", draft.employee_id));
        }

        let record = WorkRecord {
            id: Uuid::new_v4(),
            employee_id: draft.employee_id,
            date: draft.date,
            hours: draft.hours,
            strings: draft.strings,
            salary: draft.salary,
            paid: false,
            paid_at: None,
            created_at: Utc::now(),
        };
        data.records.push(record.clone());
        Ok(record)
    }

    async fn update_work_record(&self, id: Uuid, patch: &RecordPatch) -> EngineResult<()> {
        let mut data = self.data.write().await;
        let record = data
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing("update_work_record", "work record", id))?;
        patch.apply_to(record);
        Ok(())
    }

    async fn delete_work_record(&self, id: Uuid) -> EngineResult<()> {
        let mut data = self.data.write().await;
        let before = data.records.len();
        data.records.retain(|r| r.id != id);
        if data.records.len() == before {
            return Err(missing("delete_work_record", "work record", id));
        }
        Ok(())
    }

    async fn settle_batch(&self, employee_id: Uuid, now: DateTime<Utc>) -> EngineResult<usize> {
        let mut data = self.data.write().await;
        let mut changed = 0;
        for record in data
            .records
            .iter_mut()
            .filter(|r| r.employee_id == employee_id && r.is_unpaid())
        {
            record.paid = true;
            record.paid_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn get_settings(&self) -> EngineResult<Settings> {
        Ok(self.data.read().await.settings.unwrap_or(self.defaults))
    }

    async fn put_settings(&self, settings: &Settings) -> EngineResult<()> {
        self.data.write().await.settings = Some(*settings);
        Ok(())
    }
}
