//! HTTP API module for the payroll ledger.
//!
//! This module exposes the ledger's workflows and read views as JSON
//! endpoints, plus a CSV download of the full record set.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CreateEmployeeRequest, HoursFields, PreviewRequest, RecordEditRequest, UpdateEmployeeRequest,
    WorkEntryRequest,
};
pub use response::{ApiError, ApiErrorResponse, HistoryEntry, PreviewResponse, SummaryResponse};
pub use state::AppState;
