//! Application state for the ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::ledger::Ledger;
use crate::store::Backend;

/// Shared application state.
///
/// Holds the single ledger behind an async mutex, so requests that mutate
/// it run one at a time.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Mutex<Ledger<Backend>>>,
}

impl AppState {
    /// Creates a new application state around a loaded ledger.
    pub fn new(ledger: Ledger<Backend>) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Waits for exclusive access to the ledger.
    pub async fn ledger(&self) -> MutexGuard<'_, Ledger<Backend>> {
        self.ledger.lock().await
    }
}
