//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Settings;

use super::types::{AppConfig, ServerConfig, StoreConfig};

/// Loads and provides access to the service configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ledger.yaml")?;
/// println!("Listening on {}", loader.server().bind);
/// # Ok::<(), payroll_ledger::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file does not exist or cannot be read (`ConfigNotFound`)
    /// - The file is not valid YAML for [`AppConfig`], or its default rates
    ///   are negative or too large (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&path_str, &content)
    }

    /// Parses configuration from YAML text.
    ///
    /// An empty document yields the default configuration.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse("<inline>", content)
    }

    fn parse(path: &str, content: &str) -> EngineResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        config
            .defaults
            .to_settings()
            .validated()
            .map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!("defaults: {}", e),
            })?;

        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the server section.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Returns the store section.
    pub fn store(&self) -> &StoreConfig {
        &self.config.store
    }

    /// Returns the settings the store reports before any are saved.
    pub fn default_settings(&self) -> Settings {
        self.config.defaults.to_settings()
    }

    /// Returns the configured log filter.
    pub fn log_level(&self) -> &str {
        self.config.log_level.as_str()
    }
}
