//! Startup-time store selection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{BackendKind, StoreConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeePatch, RecordPatch, Settings, WorkRecord, WorkRecordDraft};

use super::{MemoryStore, SqliteStore, WorkRecordStore};

/// The store chosen at startup.
///
/// If the durable store cannot be opened the service keeps running on an
/// empty in-memory dataset; durable data is never copied into it.
#[derive(Clone)]
pub enum Backend {
    /// Durable SQLite store.
    Sqlite(SqliteStore),
    /// Local-only store.
    Memory {
        /// The dataset.
        store: MemoryStore,
        /// True when this store replaced a durable one that failed to open.
        fallback: bool,
    },
}

impl Backend {
    /// Opens the configured store.
    ///
    /// Only `StoreUnavailable` triggers the in-memory fallback; any other
    /// error is returned to the caller.
    pub fn open(config: &StoreConfig, defaults: Settings) -> EngineResult<Self> {
        match config.backend {
            BackendKind::Memory => {
                info!("Using local-only in-memory store");
                Ok(Backend::Memory {
                    store: MemoryStore::new(defaults),
                    fallback: false,
                })
            }
            BackendKind::Sqlite => match SqliteStore::open(&config.path, defaults) {
                Ok(store) => Ok(Backend::Sqlite(store)),
                Err(EngineError::StoreUnavailable { message }) => {
                    warn!(
                        path = %config.path.display(),
                        error = %message,
                        "Durable store unavailable, falling back to local-only in-memory store"
                    );
                    Ok(Backend::Memory {
                        store: MemoryStore::new(defaults),
                        fallback: true,
                    })
                }
                Err(e) => Err(e),
            },
        }
    }

    /// A local-only in-memory backend, as used by tests.
    pub fn memory(defaults: Settings) -> Self {
        Backend::Memory {
            store: MemoryStore::new(defaults),
            fallback: false,
        }
    }

    /// Returns true if data written through this backend will not survive
    /// a restart.
    pub fn is_local_only(&self) -> bool {
        matches!(self, Backend::Memory { .. })
    }

    /// Returns true if the configured durable store could not be opened.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Backend::Memory { fallback: true, .. })
    }
}

macro_rules! delegate {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            Backend::Sqlite($store) => $call.await,
            Backend::Memory { store: $store, .. } => $call.await,
        }
    };
}

impl WorkRecordStore for Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite(store) => store.name(),
            Backend::Memory { store, .. } => store.name(),
        }
    }

    async fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        delegate!(self, s => s.list_employees())
    }

    async fn create_employee(
        &self,
        name: &str,
        hourly_rate: Option<Decimal>,
    ) -> EngineResult<Employee> {
        delegate!(self, s => s.create_employee(name, hourly_rate))
    }

    async fn update_employee(&self, id: Uuid, patch: &EmployeePatch) -> EngineResult<Employee> {
        delegate!(self, s => s.update_employee(id, patch))
    }

    async fn delete_employee(&self, id: Uuid) -> EngineResult<()> {
        delegate!(self, s => s.delete_employee(id))
    }

    async fn list_work_records(&self) -> EngineResult<Vec<WorkRecord>> {
        delegate!(self, s => s.list_work_records())
    }

    async fn create_work_record(&self, draft: &WorkRecordDraft) -> EngineResult<WorkRecord> {
        delegate!(self, s => s.create_work_record(draft))
    }

    async fn update_work_record(&self, id: Uuid, patch: &RecordPatch) -> EngineResult<()> {
        delegate!(self, s => s.update_work_record(id, patch))
    }

    async fn delete_work_record(&self, id: Uuid) -> EngineResult<()> {
        delegate!(self, s => s.delete_work_record(id))
    }

    async fn settle_batch(&self, employee_id: Uuid, now: DateTime<Utc>) -> EngineResult<usize> {
        delegate!(self, s => s.settle_batch(employee_id, now))
    }

    async fn get_settings(&self) -> EngineResult<Settings> {
        delegate!(self, s => s.get_settings())
    }

    async fn put_settings(&self, settings: &Settings) -> EngineResult<()> {
        delegate!(self, s => s.put_settings(settings))
    }
}
