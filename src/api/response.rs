//! Response types for the ledger API.
//!
//! This module defines the error response structures, the mapping from
//! [`EngineError`] to HTTP status codes, and the JSON views returned by the
//! read endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{RateSource, ResolvedRates};
use crate::error::EngineError;
use crate::models::{Employee, Payout, UnpaidBalance, WorkKind, WorkRecord};
use crate::reporting::{UNKNOWN_EMPLOYEE, employee_name};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid path or query parameter error response.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new("INVALID_PARAMETER", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("VALIDATION_ERROR", message, field),
            },
            EngineError::EmployeeNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("EMPLOYEE_NOT_FOUND", message),
            },
            EngineError::RecordNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("RECORD_NOT_FOUND", message),
            },
            EngineError::StoreUnavailable { message } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details("STORE_UNAVAILABLE", "Store unavailable", message),
            },
            EngineError::StoreOperationFailed { operation, message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "STORE_OPERATION_FAILED",
                    format!("Store operation '{}' failed", operation),
                    message,
                ),
            },
            EngineError::Export { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_FAILED", "Export failed", message),
            },
        }
    }
}

/// Body of `GET /summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Sum of every unpaid salary.
    pub total_unpaid: Decimal,
    /// Per-employee unpaid totals, zero balances omitted.
    pub unpaid_balances: Vec<UnpaidBalance>,
    /// Most recent payout of each employee, newest first.
    pub last_payouts: Vec<Payout>,
    /// Number of employees.
    pub employee_count: usize,
    /// Number of work records.
    pub record_count: usize,
    /// True when data is held only in memory and will be lost on restart.
    pub local_only: bool,
}

/// One row of `GET /records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The stored record.
    #[serde(flatten)]
    pub record: WorkRecord,
    /// The employee's name, or a placeholder if they no longer exist.
    pub employee_name: String,
    /// Kind of work.
    pub kind: WorkKind,
}

impl HistoryEntry {
    /// Builds the entry for one record.
    pub fn new(record: &WorkRecord, employees: &[Employee]) -> Self {
        Self {
            record: record.clone(),
            employee_name: employee_name(employees, record.employee_id)
                .unwrap_or(UNKNOWN_EMPLOYEE)
                .to_string(),
            kind: record.kind(),
        }
    }
}

/// Body of `POST /records/preview`.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    /// Hours the salary was computed from.
    pub hours: Decimal,
    /// Pieces the salary was computed from.
    pub strings: Decimal,
    /// Hourly rate applied.
    pub hourly_rate: Decimal,
    /// Piece price applied.
    pub unit_price: Decimal,
    /// Where the hourly rate came from.
    pub rate_source: RateSource,
    /// The salary the entry would be stored with.
    pub salary: Decimal,
}

impl PreviewResponse {
    /// Builds the preview from its inputs and result.
    pub fn new(hours: Decimal, strings: Decimal, rates: ResolvedRates, salary: Decimal) -> Self {
        Self {
            hours,
            strings,
            hourly_rate: rates.hourly_rate,
            unit_price: rates.unit_price,
            rate_source: rates.source,
            salary,
        }
    }
}
