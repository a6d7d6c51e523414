//! Configuration types for the ledger service.
//!
//! These structures are deserialized from the YAML configuration file.
//! Every section is optional; missing values fall back to the defaults
//! documented on each field.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Settings;

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Which store to use and where it lives.
    pub store: StoreConfig,
    /// Rates used until settings are saved in the store.
    pub defaults: RateDefaults,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: LogLevel,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on. Defaults to `127.0.0.1:3000`.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Available store implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Durable SQLite database file.
    #[default]
    Sqlite,
    /// Local-only dataset held in memory.
    Memory,
}

/// Store selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend kind. Defaults to `sqlite`.
    pub backend: BackendKind,
    /// Database file for the SQLite backend. Defaults to `ledger.sqlite3`.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: PathBuf::from("ledger.sqlite3"),
        }
    }
}

/// Initial rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateDefaults {
    /// Default hourly rate. Defaults to 20.
    pub hourly_rate: Decimal,
    /// Default price per piece. Defaults to 0.25.
    pub unit_price: Decimal,
}

impl Default for RateDefaults {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            hourly_rate: settings.default_hourly_rate,
            unit_price: settings.default_unit_price,
        }
    }
}

impl RateDefaults {
    /// Converts the configured rates into ledger settings.
    pub fn to_settings(&self) -> Settings {
        Settings {
            default_hourly_rate: self.hourly_rate,
            default_unit_price: self.unit_price,
        }
    }
}

/// Log filter directive, e.g. `info` or `payroll_ledger=debug`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(String);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel("info".to_string())
    }
}

impl LogLevel {
    /// The directive as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
