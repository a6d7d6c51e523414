//! HTTP request handlers for the ledger API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! request is tagged with a correlation id in the logs.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::ledger::{RecordEdit, WorkEntry};
use crate::models::Settings;
use crate::reporting::{HistoryFilter, export_file_name};

use super::request::{
    CreateEmployeeRequest, PreviewRequest, RecordEditRequest, UpdateEmployeeRequest,
    WorkEntryRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, HistoryEntry, PreviewResponse, SummaryResponse,
};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            patch(update_employee).delete(delete_employee),
        )
        .route("/employees/:id/settle", post(settle_employee))
        .route("/records", get(list_records).post(create_record))
        .route("/records/preview", post(preview_record))
        .route("/records/:id", patch(edit_record).delete(delete_record))
        .route("/settlements", get(pending_settlements))
        .route("/summary", get(summary))
        .route("/settings", get(get_settings).put(put_settings))
        .route("/export.csv", get(export_csv))
        .with_state(state)
}

/// Unwraps a JSON body, turning a rejection into a 400 response.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn path_id(correlation_id: Uuid, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid path parameter"
        );
        ApiErrorResponse::bad_request(ApiError::invalid_parameter(rejection.body_text()))
    })
}

/// Logs a failed operation and converts it into an error response.
fn failure(correlation_id: Uuid, operation: &str, err: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    err.into()
}

fn respond<T: Serialize>(status: StatusCode, result: ApiResult<T>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Handler for GET /employees.
async fn list_employees(State(state): State<AppState>) -> Response {
    let ledger = state.ledger().await;
    Json(ledger.employees().to_vec()).into_response()
}

/// Handler for POST /employees.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing create employee request");

    let result = async {
        let req = json_body(correlation_id, payload)?;
        let mut ledger = state.ledger().await;
        ledger
            .add_employee(&req.name, req.hourly_rate)
            .await
            .map_err(|e| failure(correlation_id, "add_employee", e))
    }
    .await;

    respond(StatusCode::CREATED, result)
}

/// Handler for PATCH /employees/:id.
async fn update_employee(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let id = path_id(correlation_id, path)?;
        let req = json_body(correlation_id, payload)?;
        info!(correlation_id = %correlation_id, employee_id = %id, "Processing update employee request");
        let mut ledger = state.ledger().await;
        ledger
            .update_employee(id, req.into())
            .await
            .map_err(|e| failure(correlation_id, "update_employee", e))
    }
    .await;

    respond(StatusCode::OK, result)
}

/// Handler for DELETE /employees/:id.
async fn delete_employee(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let id = path_id(correlation_id, path)?;
        info!(correlation_id = %correlation_id, employee_id = %id, "Processing delete employee request");
        let mut ledger = state.ledger().await;
        ledger
            .remove_employee(id)
            .await
            .map_err(|e| failure(correlation_id, "remove_employee", e))
    }
    .await;

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Handler for POST /employees/:id/settle.
///
/// Settles at the server's current time. Responds 204 when nothing was
/// unpaid.
async fn settle_employee(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let id = path_id(correlation_id, path)?;
        info!(correlation_id = %correlation_id, employee_id = %id, "Processing settlement request");
        let mut ledger = state.ledger().await;
        ledger
            .settle(id, Utc::now())
            .await
            .map_err(|e| failure(correlation_id, "settle", e))
    }
    .await;

    match result {
        Ok(Some(payout)) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %payout.employee_id,
                record_count = payout.record_count(),
                amount = %payout.amount,
                "Settlement completed"
            );
            (StatusCode::OK, Json(payout)).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Handler for GET /records.
async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<HistoryFilter>, QueryRejection>,
) -> Response {
    let filter = match query {
        Ok(Query(filter)) => filter,
        Err(rejection) => {
            return ApiErrorResponse::bad_request(ApiError::invalid_parameter(
                rejection.body_text(),
            ))
            .into_response();
        }
    };

    let ledger = state.ledger().await;
    let entries: Vec<HistoryEntry> = ledger
        .history(&filter)
        .into_iter()
        .map(|record| HistoryEntry::new(record, ledger.employees()))
        .collect();
    Json(entries).into_response()
}

/// Handler for POST /records.
async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<WorkEntryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing work entry request");

    let result = async {
        let req = json_body(correlation_id, payload)?;
        let entry =
            WorkEntry::try_from(req).map_err(|e| failure(correlation_id, "record_work", e))?;
        let mut ledger = state.ledger().await;
        ledger
            .record_work(entry)
            .await
            .map_err(|e| failure(correlation_id, "record_work", e))
    }
    .await;

    respond(StatusCode::CREATED, result)
}

/// Handler for POST /records/preview.
async fn preview_record(
    State(state): State<AppState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let req = json_body(correlation_id, payload)?;
        let hours = match req.hours.to_input() {
            Ok(Some(input)) => input.resolve(),
            Ok(None) => Ok(Decimal::ZERO),
            Err(e) => Err(e),
        }
        .map_err(|e| failure(correlation_id, "preview_salary", e))?;
        let strings = req.strings.unwrap_or(Decimal::ZERO);

        let ledger = state.ledger().await;
        let (salary, rates) = ledger
            .preview_salary(req.employee_id, hours, strings)
            .map_err(|e| failure(correlation_id, "preview_salary", e))?;
        Ok::<_, ApiErrorResponse>(PreviewResponse::new(hours, strings, rates, salary))
    }
    .await;

    respond(StatusCode::OK, result)
}

/// Handler for PATCH /records/:id.
async fn edit_record(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RecordEditRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let id = path_id(correlation_id, path)?;
        let req = json_body(correlation_id, payload)?;
        info!(correlation_id = %correlation_id, record_id = %id, "Processing record edit request");
        let edit = RecordEdit::try_from(req).map_err(|e| failure(correlation_id, "edit_record", e))?;
        let mut ledger = state.ledger().await;
        ledger
            .edit_record(id, edit)
            .await
            .map_err(|e| failure(correlation_id, "edit_record", e))
    }
    .await;

    respond(StatusCode::OK, result)
}

/// Handler for DELETE /records/:id.
async fn delete_record(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let id = path_id(correlation_id, path)?;
        info!(correlation_id = %correlation_id, record_id = %id, "Processing record delete request");
        let mut ledger = state.ledger().await;
        ledger
            .delete_record(id)
            .await
            .map_err(|e| failure(correlation_id, "delete_record", e))
    }
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Handler for GET /settlements.
async fn pending_settlements(State(state): State<AppState>) -> Response {
    let ledger = state.ledger().await;
    Json(ledger.pending_settlements()).into_response()
}

/// Handler for GET /summary.
async fn summary(State(state): State<AppState>) -> Response {
    let ledger = state.ledger().await;
    let body = SummaryResponse {
        total_unpaid: ledger.total_unpaid(),
        unpaid_balances: ledger.unpaid_balances(),
        last_payouts: ledger.last_payouts(),
        employee_count: ledger.employees().len(),
        record_count: ledger.records().len(),
        local_only: ledger.store().is_local_only(),
    };
    Json(body).into_response()
}

/// Handler for GET /settings.
async fn get_settings(State(state): State<AppState>) -> Response {
    let ledger = state.ledger().await;
    Json(ledger.settings()).into_response()
}

/// Handler for PUT /settings.
async fn put_settings(
    State(state): State<AppState>,
    payload: Result<Json<Settings>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing settings update request");

    let result = async {
        let settings = json_body(correlation_id, payload)?;
        let mut ledger = state.ledger().await;
        ledger
            .update_settings(settings)
            .await
            .map_err(|e| failure(correlation_id, "update_settings", e))
    }
    .await;

    respond(StatusCode::OK, result)
}

/// Handler for GET /export.csv.
async fn export_csv(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let ledger = state.ledger().await;

    match ledger.export_csv() {
        Ok(bytes) => {
            let file_name = export_file_name(Utc::now().date_naive());
            info!(
                correlation_id = %correlation_id,
                record_count = ledger.records().len(),
                file_name = %file_name,
                "Export completed"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => failure(correlation_id, "export", err).into_response(),
    }
}
