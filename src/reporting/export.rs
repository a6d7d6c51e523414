//! Flat tabular export of the record set.
//!
//! [`export_rows`] maps every record to an [`ExportRow`] of display strings;
//! [`write_csv`] encodes those rows as a spreadsheet-friendly CSV file
//! (UTF-8 with a byte-order mark).

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, WorkRecord};

use super::aggregate::employee_name;

/// Name shown for a record whose employee no longer exists.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// UTF-8 byte-order mark written ahead of the CSV header.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One exported line. Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Work date with weekday, e.g. `2024-01-01 (Mon)`.
    #[serde(rename = "Date")]
    pub date: String,
    /// Employee name, or [`UNKNOWN_EMPLOYEE`].
    #[serde(rename = "Employee Name")]
    pub employee_name: String,
    /// `hourly`, `piece` or `mixed`.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Hours worked.
    #[serde(rename = "Hours")]
    pub hours: String,
    /// Pieces completed.
    #[serde(rename = "Strings")]
    pub strings: String,
    /// Salary with exactly two decimals.
    #[serde(rename = "Salary")]
    pub salary: String,
    /// `Paid` or `Unpaid`.
    #[serde(rename = "Paid Status")]
    pub paid_status: String,
    /// Settlement date, empty while unpaid.
    #[serde(rename = "Paid Date")]
    pub paid_date: String,
}

impl ExportRow {
    /// Builds the row for one record.
    ///
    /// A dangling employee reference is logged and exported with a
    /// placeholder name instead of failing the export.
    pub fn from_record(record: &WorkRecord, employees: &[Employee]) -> Self {
        let name = match employee_name(employees, record.employee_id) {
            Some(name) => name.to_string(),
            None => {
                warn!(
                    record_id = %record.id,
                    employee_id = %record.employee_id,
                    "Exporting record with dangling employee reference"
                );
                UNKNOWN_EMPLOYEE.to_string()
            }
        };

        Self {
            date: format_date_with_weekday(record.date),
            employee_name: name,
            kind: record.kind().label().to_string(),
            hours: record.hours.normalize().to_string(),
            strings: record.strings.normalize().to_string(),
            salary: format_money(record.salary),
            paid_status: if record.paid { "Paid" } else { "Unpaid" }.to_string(),
            paid_date: record
                .paid_at
                .map(|at| at.date_naive().format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Lazily maps each record to its export row, in store order.
///
/// The iterator keeps no state beyond its position, so calling this again
/// restarts the export from the first record.
pub fn export_rows<'a>(
    records: &'a [WorkRecord],
    employees: &'a [Employee],
) -> impl Iterator<Item = ExportRow> + Clone + 'a {
    records
        .iter()
        .map(move |record| ExportRow::from_record(record, employees))
}

/// Writes rows as CSV: BOM, header line, then one line per row.
///
/// Fields containing a comma, quote or line break are quoted with inner
/// quotes doubled.
pub fn write_csv<W, I>(mut writer: W, rows: I) -> EngineResult<()>
where
    W: Write,
    I: IntoIterator<Item = ExportRow>,
{
    writer.write_all(UTF8_BOM).map_err(export_failed)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        csv_writer.write_record(HEADER).map_err(export_failed)?;
    }
    for row in rows {
        csv_writer.serialize(row).map_err(export_failed)?;
    }

    csv_writer.flush().map_err(export_failed)?;
    Ok(())
}

/// Encodes the whole record set as CSV bytes.
pub fn to_csv_bytes(records: &[WorkRecord], employees: &[Employee]) -> EngineResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, export_rows(records, employees))?;
    Ok(buffer)
}

/// Download file name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("salary_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Column names, in order.
pub const HEADER: [&str; 8] = [
    "Date",
    "Employee Name",
    "Type",
    "Hours",
    "Strings",
    "Salary",
    "Paid Status",
    "Paid Date",
];

fn format_date_with_weekday(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%a)").to_string()
}

fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn export_failed(err: impl std::fmt::Display) -> EngineError {
    EngineError::Export {
        message: err.to_string(),
    }
}
