//! SQLite schema and the mapping between rows and domain models.
//!
//! This is the only place that knows the storage-side column names
//! (`employee_id`, `daily_salary`, `paid_at`, `hourly_rate`, `status`, ...).
//! Decimals, dates and timestamps are stored as TEXT so they round-trip
//! exactly; settlement batches are matched on exact `paid_at` equality.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Employee, EmployeePatch, RecordPatch, Settings, WorkRecord};

pub(crate) const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id              TEXT PRIMARY KEY,
        name            TEXT NOT NULL,
        hourly_rate     TEXT
    );

    CREATE TABLE IF NOT EXISTS work_records (
        id              TEXT PRIMARY KEY,
        employee_id     TEXT NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        date            TEXT NOT NULL,
        hours           TEXT NOT NULL DEFAULT '0',
        strings         TEXT NOT NULL DEFAULT '0',
        daily_salary    TEXT NOT NULL,
        status          TEXT NOT NULL DEFAULT 'unsettled',
        paid            INTEGER NOT NULL DEFAULT 0,
        paid_at         TEXT,
        created_at      TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_work_records_employee ON work_records(employee_id, paid);

    CREATE TABLE IF NOT EXISTS settings (
        id                  INTEGER PRIMARY KEY CHECK (id = 1),
        default_hourly_rate TEXT NOT NULL,
        default_unit_price  TEXT NOT NULL
    );
";

pub(crate) const STATUS_SETTLED: &str = "settled";
pub(crate) const STATUS_UNSETTLED: &str = "unsettled";

pub(crate) const SELECT_EMPLOYEES: &str =
    "SELECT id, name, hourly_rate FROM employees ORDER BY rowid ASC";

pub(crate) const SELECT_EMPLOYEE: &str = "SELECT id, name, hourly_rate FROM employees WHERE id = ?1";

pub(crate) const SELECT_WORK_RECORDS: &str = "
    SELECT id, employee_id, date, hours, strings, daily_salary, paid, paid_at, created_at
    FROM work_records
    ORDER BY rowid ASC";

pub(crate) const INSERT_EMPLOYEE: &str =
    "INSERT INTO employees (id, name, hourly_rate) VALUES (?1, ?2, ?3)";

pub(crate) const INSERT_WORK_RECORD: &str = "
    INSERT INTO work_records
        (id, employee_id, date, hours, strings, daily_salary, status, paid, paid_at, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, NULL, ?8)";

pub(crate) const SETTLE_BATCH: &str = "
    UPDATE work_records
    SET paid = 1, paid_at = ?1, status = ?2
    WHERE employee_id = ?3 AND paid = 0";

pub(crate) const SELECT_SETTINGS: &str =
    "SELECT default_hourly_rate, default_unit_price FROM settings WHERE id = 1";

pub(crate) const UPSERT_SETTINGS: &str = "
    INSERT INTO settings (id, default_hourly_rate, default_unit_price) VALUES (1, ?1, ?2)
    ON CONFLICT(id) DO UPDATE SET
        default_hourly_rate = excluded.default_hourly_rate,
        default_unit_price = excluded.default_unit_price";

pub(crate) fn decimal_to_sql(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn date_to_sql(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub(crate) fn timestamp_to_sql(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// A column and its new value; `None` writes `NULL`.
pub(crate) type Assignment = (&'static str, Option<String>);

/// Column/value pairs for an `UPDATE employees SET ...`.
pub(crate) fn employee_assignments(patch: &EmployeePatch) -> Vec<Assignment> {
    let mut assignments = Vec::new();
    if let Some(name) = &patch.name {
        assignments.push(("name", Some(name.clone())));
    }
    if patch.clear_hourly_rate {
        assignments.push(("hourly_rate", None));
    } else if let Some(rate) = patch.hourly_rate {
        assignments.push(("hourly_rate", Some(decimal_to_sql(rate))));
    }
    assignments
}

/// Column/value pairs for an `UPDATE work_records SET ...`.
pub(crate) fn record_assignments(patch: &RecordPatch) -> Vec<Assignment> {
    let mut assignments = Vec::new();
    if let Some(date) = patch.date {
        assignments.push(("date", Some(date_to_sql(date))));
    }
    if let Some(hours) = patch.hours {
        assignments.push(("hours", Some(decimal_to_sql(hours))));
    }
    if let Some(strings) = patch.strings {
        assignments.push(("strings", Some(decimal_to_sql(strings))));
    }
    if let Some(salary) = patch.salary {
        assignments.push(("daily_salary", Some(decimal_to_sql(salary))));
    }
    assignments
}

/// Builds `UPDATE <table> SET a = ?1, b = ?2 WHERE id = ?3`.
pub(crate) fn update_statement(table: &str, assignments: &[Assignment]) -> String {
    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        table,
        set_clause,
        assignments.len() + 1
    )
}

pub(crate) fn employee_from_row(row: &Row) -> rusqlite::Result<Employee> {
    let hourly_rate: Option<String> = row.get("hourly_rate")?;
    Ok(Employee {
        id: parse_column(row, "id", Uuid::from_str)?,
        name: row.get("name")?,
        hourly_rate: hourly_rate
            .map(|raw| parse_text("hourly_rate", &raw, Decimal::from_str))
            .transpose()?,
    })
}

pub(crate) fn work_record_from_row(row: &Row) -> rusqlite::Result<WorkRecord> {
    let paid: bool = row.get("paid")?;
    let paid_at: Option<String> = row.get("paid_at")?;
    let paid_at = paid_at
        .map(|raw| parse_text("paid_at", &raw, parse_timestamp))
        .transpose()?;

    if paid != paid_at.is_some() {
        let id: String = row.get("id")?;
        return Err(conversion_error(
            "paid_at",
            format!("record {} has paid = {} but paid_at = {:?}", id, paid, paid_at),
        ));
    }

    Ok(WorkRecord {
        id: parse_column(row, "id", Uuid::from_str)?,
        employee_id: parse_column(row, "employee_id", Uuid::from_str)?,
        date: parse_column(row, "date", |raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))?,
        hours: parse_column(row, "hours", Decimal::from_str)?,
        strings: parse_column(row, "strings", Decimal::from_str)?,
        salary: parse_column(row, "daily_salary", Decimal::from_str)?,
        paid,
        paid_at,
        created_at: parse_column(row, "created_at", parse_timestamp)?,
    })
}

pub(crate) fn settings_from_row(row: &Row) -> rusqlite::Result<Settings> {
    Ok(Settings {
        default_hourly_rate: parse_column(row, "default_hourly_rate", Decimal::from_str)?,
        default_unit_price: parse_column(row, "default_unit_price", Decimal::from_str)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
}

fn parse_column<T, E, F>(row: &Row, column: &'static str, parse: F) -> rusqlite::Result<T>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    let raw: String = row.get(column)?;
    parse_text(column, &raw, parse)
}

fn parse_text<T, E, F>(column: &'static str, raw: &str, parse: F) -> rusqlite::Result<T>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    parse(raw).map_err(|e| conversion_error(column, format!("invalid value '{}': {}", raw, e)))
}

fn conversion_error(column: &str, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        format!("{}: {}", column, message).into(),
    )
}
