//! Configuration loading for the ledger service.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ledger.yaml").unwrap();
//! println!("Store backend: {:?}", config.store().backend);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, BackendKind, LogLevel, RateDefaults, ServerConfig, StoreConfig};
