//! Request types for the ledger API.
//!
//! This module defines the JSON request bodies and their conversion into
//! the ledger's input types. Clock times arrive as `HH:MM` strings and are
//! parsed here so that a bad value is reported against its field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::parse_clock_time;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{HoursInput, RecordEdit, WorkEntry};
use crate::models::EmployeePatch;

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Display name.
    pub name: String,
    /// Optional hourly rate override.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

/// Request body for `PATCH /employees/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New hourly rate override.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Return the employee to the system default rate.
    #[serde(default)]
    pub clear_hourly_rate: bool,
}

impl From<UpdateEmployeeRequest> for EmployeePatch {
    fn from(req: UpdateEmployeeRequest) -> Self {
        EmployeePatch {
            name: req.name,
            hourly_rate: req.hourly_rate,
            clear_hourly_rate: req.clear_hourly_rate,
        }
    }
}

/// How hours are given in a request: a number, or a start/end pair.
///
/// A number wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoursFields {
    /// Hours worked.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Start of work, `HH:MM`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// End of work, `HH:MM`.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl HoursFields {
    /// Resolves the fields into an hours input, if any was given.
    pub fn to_input(&self) -> EngineResult<Option<HoursInput>> {
        if let Some(hours) = self.hours {
            return Ok(Some(HoursInput::Explicit(hours)));
        }
        match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => Ok(Some(HoursInput::Span {
                start: parse_clock_time("start_time", start)?,
                end: parse_clock_time("end_time", end)?,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(EngineError::validation(
                "end_time",
                "required when start_time is given",
            )),
            (None, Some(_)) => Err(EngineError::validation(
                "start_time",
                "required when end_time is given",
            )),
        }
    }
}

/// Request body for `POST /records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkEntryRequest {
    /// The employee who did the work.
    pub employee_id: Uuid,
    /// Calendar date of the work.
    pub date: NaiveDate,
    /// Hours, directly or as a clock span.
    #[serde(flatten)]
    pub hours: HoursFields,
    /// Pieces completed.
    #[serde(default)]
    pub strings: Option<Decimal>,
}

impl TryFrom<WorkEntryRequest> for WorkEntry {
    type Error = EngineError;

    fn try_from(req: WorkEntryRequest) -> EngineResult<Self> {
        Ok(WorkEntry {
            employee_id: req.employee_id,
            date: req.date,
            hours: req.hours.to_input()?,
            strings: req.strings.unwrap_or(Decimal::ZERO),
        })
    }
}

/// Request body for `POST /records/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// The employee the work would be recorded for.
    pub employee_id: Uuid,
    /// Hours, directly or as a clock span.
    #[serde(flatten)]
    pub hours: HoursFields,
    /// Pieces completed.
    #[serde(default)]
    pub strings: Option<Decimal>,
}

/// Request body for `PATCH /records/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordEditRequest {
    /// New date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New hours, directly or as a clock span.
    #[serde(flatten)]
    pub hours: HoursFields,
    /// New piece count.
    #[serde(default)]
    pub strings: Option<Decimal>,
    /// Explicit salary, skipping recomputation.
    #[serde(default)]
    pub salary: Option<Decimal>,
}

impl TryFrom<RecordEditRequest> for RecordEdit {
    type Error = EngineError;

    fn try_from(req: RecordEditRequest) -> EngineResult<Self> {
        Ok(RecordEdit {
            date: req.date,
            hours: req.hours.to_input()?,
            strings: req.strings,
            salary: req.salary,
        })
    }
}
