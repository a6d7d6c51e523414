//! Error types for the payroll ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the ledger can surface to its caller.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll ledger.
///
/// Validation failures are raised before anything reaches the store, so a
/// `Validation` error never leaves partially applied state behind.
///
/// # Example
///
/// ```
/// use payroll_ledger::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "name".to_string(),
///     message: "must not be empty".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid value for 'name': must not be empty");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input was rejected before reaching the store.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The offending input field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// No employee with the given id exists.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// No work record with the given id exists.
    #[error("Work record not found: {id}")]
    RecordNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// The backing store cannot be reached.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Why the store could not be reached.
        message: String,
    },

    /// The store rejected or failed an operation.
    #[error("Store operation '{operation}' failed: {message}")]
    StoreOperationFailed {
        /// The store operation that failed (e.g. "settle_batch").
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// The export could not be encoded or written.
    #[error("Export failed: {message}")]
    Export {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::StoreOperationFailed`] error.
    pub fn store_failed(operation: impl Into<String>, message: impl ToString) -> Self {
        EngineError::StoreOperationFailed {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
