//! Integration tests for the payroll ledger HTTP API.
//!
//! This test suite drives the router end to end over an in-memory store:
//! - Employee management and cascade delete
//! - Recording work from hours, clock spans and piece counts
//! - Salary snapshots across rate changes
//! - Settlement batches and the last-payout view
//! - History filtering and CSV export
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_ledger::api::{AppState, create_router};
use payroll_ledger::ledger::Ledger;
use payroll_ledger::models::Settings;
use payroll_ledger::store::Backend;

// =============================================================================
// Test Helpers
// =============================================================================

async fn create_router_for_test() -> Router {
    let ledger = Ledger::load(Backend::memory(Settings::default()))
        .await
        .expect("Failed to load ledger");
    create_router(AppState::new(ledger))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn decimal_field(value: &Value, field: &str) -> Decimal {
    decimal(value[field].as_str().unwrap_or_else(|| panic!("{} is not a string", field)))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(router, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn add_employee(router: &Router, name: &str, hourly_rate: Option<&str>) -> String {
    let mut body = json!({ "name": name });
    if let Some(rate) = hourly_rate {
        body["hourly_rate"] = json!(rate);
    }
    let (status, json) = send(router, "POST", "/employees", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["id"].as_str().unwrap().to_string()
}

async fn record_work(router: &Router, body: Value) -> Value {
    let (status, json) = send(router, "POST", "/records", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn test_ana_works_eight_hours_and_is_settled() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;

    let record = record_work(
        &router,
        json!({ "employee_id": ana, "date": "2024-01-01", "hours": "8" }),
    )
    .await;
    assert_eq!(decimal_field(&record, "salary"), decimal("160.00"));
    assert_eq!(record["paid"], false);
    assert!(record["paid_at"].is_null());

    let (status, payout) = send(&router, "POST", &format!("/employees/{}/settle", ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&payout, "amount"), decimal("160"));
    let paid_at = payout["paid_at"].as_str().unwrap().to_string();

    let (_, history) = send(&router, "GET", "/records", None).await;
    assert_eq!(history[0]["paid"], true);
    assert_eq!(history[0]["paid_at"], paid_at.as_str());

    let (_, summary) = send(&router, "GET", "/summary", None).await;
    let payouts = summary["last_payouts"].as_array().unwrap();
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0]["employee_name"], "Ana");
    assert_eq!(decimal_field(&payouts[0], "amount"), decimal("160.00"));
    assert_eq!(payouts[0]["paid_at"], paid_at.as_str());
    assert_eq!(decimal_field(&summary, "total_unpaid"), Decimal::ZERO);
    assert_eq!(summary["local_only"], true);
}

// =============================================================================
// Employees
// =============================================================================

#[tokio::test]
async fn test_create_and_list_employees() {
    let router = create_router_for_test().await;
    add_employee(&router, "  Ana ", None).await;
    add_employee(&router, "Bo", Some("25.50")).await;

    let (status, employees) = send(&router, "GET", "/employees", None).await;

    assert_eq!(status, StatusCode::OK);
    let employees = employees.as_array().unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0]["name"], "Ana");
    assert!(employees[0]["hourly_rate"].is_null());
    assert_eq!(decimal_field(&employees[1], "hourly_rate"), decimal("25.5"));
}

#[tokio::test]
async fn test_empty_employee_name_is_rejected() {
    let router = create_router_for_test().await;

    let (status, error) = send(&router, "POST", "/employees", Some(json!({ "name": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "name");
}

#[tokio::test]
async fn test_rate_override_only_affects_new_records() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    record_work(
        &router,
        json!({ "employee_id": ana, "date": "2024-01-01", "hours": "8" }),
    )
    .await;

    let (status, updated) = send(
        &router,
        "PATCH",
        &format!("/employees/{}", ana),
        Some(json!({ "hourly_rate": "30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana");

    let second = record_work(
        &router,
        json!({ "employee_id": ana, "date": "2024-01-02", "hours": "8" }),
    )
    .await;
    assert_eq!(decimal_field(&second, "salary"), decimal("240"));

    let (_, history) = send(&router, "GET", "/records?start_date=2024-01-01&end_date=2024-01-01", None).await;
    assert_eq!(decimal_field(&history[0], "salary"), decimal("160"));
}

#[tokio::test]
async fn test_clearing_rate_override_restores_default() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", Some("30")).await;

    let (status, updated) = send(
        &router,
        "PATCH",
        &format!("/employees/{}", ana),
        Some(json!({ "clear_hourly_rate": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["hourly_rate"].is_null());

    let record = record_work(
        &router,
        json!({ "employee_id": ana, "date": "2024-01-01", "hours": "8" }),
    )
    .await;
    assert_eq!(decimal_field(&record, "salary"), decimal("160"));
}

#[tokio::test]
async fn test_delete_employee_removes_their_history() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    let bo = add_employee(&router, "Bo", None).await;
    for day in ["2024-01-01", "2024-01-02"] {
        record_work(&router, json!({ "employee_id": ana, "date": day, "hours": "4" })).await;
    }
    record_work(&router, json!({ "employee_id": bo, "date": "2024-01-01", "strings": "40" })).await;

    let (status, _) = send(&router, "DELETE", &format!("/employees/{}", ana), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, history) = send(&router, "GET", "/records", None).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["employee_id"], bo.as_str());

    let (status, _) = send(&router, "DELETE", &format!("/employees/{}", ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Recording work
// =============================================================================

#[tokio::test]
async fn test_record_overnight_span() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;

    let record = record_work(
        &router,
        json!({
            "employee_id": ana,
            "date": "2024-01-05",
            "start_time": "22:00",
            "end_time": "02:00"
        }),
    )
    .await;

    assert_eq!(decimal_field(&record, "hours"), decimal("4"));
    assert_eq!(decimal_field(&record, "salary"), decimal("80"));
}

#[tokio::test]
async fn test_zero_length_span_is_rejected() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;

    let (status, error) = send(
        &router,
        "POST",
        "/records",
        Some(json!({
            "employee_id": ana,
            "date": "2024-01-05",
            "start_time": "10:00",
            "end_time": "10:00"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_record_without_work_is_rejected() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;

    let (status, _) = send(
        &router,
        "POST",
        "/records",
        Some(json!({ "employee_id": ana, "date": "2024-01-05" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = send(&router, "GET", "/records", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_huge_hours_are_rejected_not_panicking() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;

    let (status, error) = send(
        &router,
        "POST",
        "/records",
        Some(json!({
            "employee_id": ana,
            "date": "2024-01-05",
            "hours": Decimal::MAX.to_string()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "hours");

    let (status, _) = send(&router, "GET", "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_record_for_unknown_employee_is_not_found() {
    let router = create_router_for_test().await;

    let (status, error) = send(
        &router,
        "POST",
        "/records",
        Some(json!({
            "employee_id": "6f1c1d0e-7a51-4c43-9b0e-2f4c2c0a9d11",
            "date": "2024-01-05",
            "hours": "1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn test_preview_uses_current_rates() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", Some("18")).await;

    let (status, preview) = send(
        &router,
        "POST",
        "/records/preview",
        Some(json!({ "employee_id": ana, "start_time": "09:00", "end_time": "17:30", "strings": "20" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&preview, "hours"), decimal("8.5"));
    assert_eq!(decimal_field(&preview, "salary"), decimal("158"));
    assert_eq!(preview["rate_source"], "employee_override");

    let (_, history) = send(&router, "GET", "/records", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let router = create_router_for_test().await;

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

// =============================================================================
// Editing
// =============================================================================

#[tokio::test]
async fn test_edit_recomputes_salary_unless_given() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    let record = record_work(
        &router,
        json!({ "employee_id": ana, "date": "2024-01-01", "hours": "8" }),
    )
    .await;
    let uri = format!("/records/{}", record["id"].as_str().unwrap());

    let (status, edited) = send(&router, "PATCH", &uri, Some(json!({ "hours": "6" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&edited, "salary"), decimal("120"));

    let (_, edited) = send(&router, "PATCH", &uri, Some(json!({ "salary": "99.99" }))).await;
    assert_eq!(decimal_field(&edited, "salary"), decimal("99.99"));
    assert_eq!(decimal_field(&edited, "hours"), decimal("6"));
}

#[tokio::test]
async fn test_delete_record() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    let record = record_work(
        &router,
        json!({ "employee_id": ana, "date": "2024-01-01", "strings": "10" }),
    )
    .await;
    let uri = format!("/records/{}", record["id"].as_str().unwrap());

    let (status, _) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send(&router, "PATCH", &uri, Some(json!({ "hours": "1" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_record_id_is_bad_request() {
    let router = create_router_for_test().await;

    let (status, error) = send(&router, "DELETE", "/records/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PARAMETER");
}

// =============================================================================
// Settlement
// =============================================================================

#[tokio::test]
async fn test_settle_twice_is_noop() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    record_work(&router, json!({ "employee_id": ana, "date": "2024-01-01", "hours": "8" })).await;
    let uri = format!("/employees/{}/settle", ana);

    let (first, _) = send(&router, "POST", &uri, None).await;
    let (second, body) = send(&router, "POST", &uri, None).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (_, summary) = send(&router, "GET", "/summary", None).await;
    assert_eq!(summary["last_payouts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_pending_settlements_view() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    let bo = add_employee(&router, "Bo", None).await;
    record_work(&router, json!({ "employee_id": ana, "date": "2024-01-01", "hours": "1" })).await;
    record_work(&router, json!({ "employee_id": ana, "date": "2024-01-02", "strings": "4" })).await;
    record_work(&router, json!({ "employee_id": bo, "date": "2024-01-01", "hours": "2" })).await;
    send(&router, "POST", &format!("/employees/{}/settle", bo), None).await;

    let (status, pending) = send(&router, "GET", "/settlements", None).await;

    assert_eq!(status, StatusCode::OK);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["employee_name"], "Ana");
    assert_eq!(pending[0]["records"].as_array().unwrap().len(), 2);
    assert_eq!(decimal_field(&pending[0], "total"), decimal("21"));
}

// =============================================================================
// History, settings and export
// =============================================================================

#[tokio::test]
async fn test_history_filters_and_sorts() {
    let router = create_router_for_test().await;
    let ana = add_employee(&router, "Ana", None).await;
    let bo = add_employee(&router, "Bo", None).await;
    for (employee, date) in [(&ana, "2024-01-01"), (&ana, "2024-01-03"), (&bo, "2024-01-02"), (&ana, "2024-01-05")] {
        record_work(&router, json!({ "employee_id": employee, "date": date, "hours": "1" })).await;
    }

    let uri = format!("/records?employee_id={}&start_date=2024-01-02&end_date=2024-01-05", ana);
    let (status, history) = send(&router, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-03"]);
    assert_eq!(history[0]["kind"], "hourly");
}

#[tokio::test]
async fn test_settings_round_trip() {
    let router = create_router_for_test().await;

    let (_, defaults) = send(&router, "GET", "/settings", None).await;
    assert_eq!(decimal_field(&defaults, "default_hourly_rate"), decimal("20"));
    assert_eq!(decimal_field(&defaults, "default_unit_price"), decimal("0.25"));

    let (status, _) = send(
        &router,
        "PUT",
        "/settings",
        Some(json!({ "default_hourly_rate": "22", "default_unit_price": "0.30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = send(&router, "GET", "/settings", None).await;
    assert_eq!(decimal_field(&updated, "default_hourly_rate"), decimal("22"));

    let (status, _) = send(
        &router,
        "PUT",
        "/settings",
        Some(json!({ "default_hourly_rate": "-1", "default_unit_price": "0.30" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_csv_download() {
    let router = create_router_for_test().await;
    let smith = add_employee(&router, "Smith, John", None).await;
    record_work(
        &router,
        json!({ "employee_id": smith, "date": "2024-01-01", "strings": "50" }),
    )
    .await;

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/export.csv").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"salary_data_"));
    assert!(disposition.ends_with(".csv\""));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = std::str::from_utf8(&bytes[3..]).unwrap();
    assert_eq!(
        text,
        "Date,Employee Name,Type,Hours,Strings,Salary,Paid Status,Paid Date\n\
         2024-01-01 (Mon),\"Smith, John\",piece,0,50,12.50,Unpaid,\n"
    );
}
