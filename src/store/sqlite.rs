//! Durable SQLite-backed store.
//!
//! One connection is shared behind a mutex; every call runs on tokio's
//! blocking pool so the async runtime never waits on disk I/O.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeePatch, RecordPatch, Settings, WorkRecord, WorkRecordDraft};

use super::WorkRecordStore;
use super::schema::{
    self, CREATE_TABLES, INSERT_EMPLOYEE, INSERT_WORK_RECORD, SELECT_EMPLOYEE, SELECT_EMPLOYEES,
    SELECT_SETTINGS, SELECT_WORK_RECORDS, SETTLE_BATCH, STATUS_SETTLED, STATUS_UNSETTLED,
    UPSERT_SETTINGS,
};

/// Durable store backed by a SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    defaults: Settings,
}

impl SqliteStore {
    /// Opens or creates the database at `path`.
    ///
    /// Any failure to open or initialize the file is reported as
    /// [`EngineError::StoreUnavailable`].
    pub fn open(path: impl AsRef<Path>, defaults: Settings) -> EngineResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| EngineError::StoreUnavailable {
            message: format!("cannot open {}: {}", path.display(), e),
        })?;
        let store = Self::init(conn, defaults)?;
        info!(path = %path.display(), "Opened SQLite store");
        Ok(store)
    }

    /// Creates a store over a private in-memory database (for testing).
    pub fn in_memory(defaults: Settings) -> EngineResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| EngineError::StoreUnavailable {
            message: e.to_string(),
        })?;
        Self::init(conn, defaults)
    }

    fn init(conn: Connection, defaults: Settings) -> EngineResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .and_then(|_| conn.execute_batch(CREATE_TABLES))
            .map_err(|e| EngineError::StoreUnavailable {
                message: format!("cannot initialize schema: {}", e),
            })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            defaults,
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn run<T, F>(&self, operation: &'static str, f: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| EngineError::store_failed(operation, "connection mutex poisoned"))?;
            f(&mut *guard).map_err(|e| EngineError::store_failed(operation, e))
        })
        .await
        .map_err(|e| EngineError::store_failed(operation, e))?;

        if outcome.is_ok() {
            debug!(operation, "SQLite operation completed");
        }
        outcome
    }
}

fn require_row(changed: usize) -> rusqlite::Result<()> {
    if changed == 0 {
        Err(rusqlite::Error::QueryReturnedNoRows)
    } else {
        Ok(())
    }
}

impl WorkRecordStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        self.run("list_employees", |conn| {
            let mut stmt = conn.prepare(SELECT_EMPLOYEES)?;
            let rows = stmt.query_map([], schema::employee_from_row)?;
            rows.collect()
        })
        .await
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
        let row = employee.clone();
        self.run("create_employee", move |conn| {
            conn.execute(
                INSERT_EMPLOYEE,
                params![
                    row.id.to_string(),
                    row.name,
                    row.hourly_rate.map(schema::decimal_to_sql)
                ],
            )
        })
        .await?;
        Ok(employee)
    }

    async fn update_employee(&self, id: Uuid, patch: &EmployeePatch) -> EngineResult<Employee> {
        let assignments = schema::employee_assignments(patch);
        self.run("update_employee", move |conn| {
            if !assignments.is_empty() {
                let sql = schema::update_statement("employees", &assignments);
                let values = assignments
                    .into_iter()
                    .map(|(_, value)| value)
                    .chain(std::iter::once(Some(id.to_string())));
                require_row(conn.execute(&sql, params_from_iter(values))?)?;
            }
            conn.query_row(SELECT_EMPLOYEE, [id.to_string()], schema::employee_from_row)
        })
        .await
    }

    async fn delete_employee(&self, id: Uuid) -> EngineResult<()> {
        self.run("delete_employee", move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM work_records WHERE employee_id = ?1",
                [id.to_string()],
            )?;
            require_row(tx.execute("DELETE FROM employees WHERE id = ?1", [id.to_string()])?)?;
            tx.commit()
        })
        .await
    }

    async fn list_work_records(&self) -> EngineResult<Vec<WorkRecord>> {
        self.run("list_work_records", |conn| {
            let mut stmt = conn.prepare(SELECT_WORK_RECORDS)?;
            let rows = stmt.query_map([], schema::work_record_from_row)?;
            rows.collect()
        })
        .await
    }

    async fn create_work_record(&self, draft: &WorkRecordDraft) -> EngineResult<WorkRecord> {
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
        let row = record.clone();
        self.run("create_work_record", move |conn| {
            conn.execute(
                INSERT_WORK_RECORD,
                params![
                    row.id.to_string(),
                    row.employee_id.to_string(),
                    schema::date_to_sql(row.date),
                    schema::decimal_to_sql(row.hours),
                    schema::decimal_to_sql(row.strings),
                    schema::decimal_to_sql(row.salary),
                    STATUS_UNSETTLED,
                    schema::timestamp_to_sql(row.created_at),
                ],
            )
        })
        .await?;
        Ok(record)
    }

    async fn update_work_record(&self, id: Uuid, patch: &RecordPatch) -> EngineResult<()> {
        let assignments = schema::record_assignments(patch);
        self.run("update_work_record", move |conn| {
            if assignments.is_empty() {
                let exists = conn
                    .query_row(
                        "SELECT 1 FROM work_records WHERE id = ?1",
                        [id.to_string()],
                        |_| Ok(()),
                    )
                    .optional()?;
                return exists.ok_or(rusqlite::Error::QueryReturnedNoRows);
            }
            let sql = schema::update_statement("work_records", &assignments);
            let values = assignments
                .into_iter()
                .map(|(_, value)| value)
                .chain(std::iter::once(Some(id.to_string())));
            require_row(conn.execute(&sql, params_from_iter(values))?)
        })
        .await
    }

    async fn delete_work_record(&self, id: Uuid) -> EngineResult<()> {
        self.run("delete_work_record", move |conn| {
            require_row(conn.execute(
                "DELETE FROM work_records WHERE id = ?1",
                [id.to_string()],
            )?)
        })
        .await
    }

    async fn settle_batch(&self, employee_id: Uuid, now: DateTime<Utc>) -> EngineResult<usize> {
        self.run("settle_batch", move |conn| {
            conn.execute(
                SETTLE_BATCH,
                params![
                    schema::timestamp_to_sql(now),
                    STATUS_SETTLED,
                    employee_id.to_string()
                ],
            )
        })
        .await
    }

    async fn get_settings(&self) -> EngineResult<Settings> {
        let defaults = self.defaults;
        self.run("get_settings", move |conn| {
            let stored = conn
                .query_row(SELECT_SETTINGS, [], schema::settings_from_row)
                .optional()?;
            Ok(stored.unwrap_or(defaults))
        })
        .await
    }

    async fn put_settings(&self, settings: &Settings) -> EngineResult<()> {
        let settings = *settings;
        self.run("put_settings", move |conn| {
            conn.execute(
                UPSERT_SETTINGS,
                params![
                    schema::decimal_to_sql(settings.default_hourly_rate),
                    schema::decimal_to_sql(settings.default_unit_price)
                ],
            )
            .map(|_| ())
        })
        .await
    }
}
