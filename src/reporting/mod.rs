//! Reporting over the record set.
//!
//! This module contains the aggregations behind the dashboard, settlement
//! and history views, and the flat CSV export.

mod aggregate;
mod export;

pub use aggregate::{
    HistoryFilter, employee_name, history, last_payouts, pending_settlements, total_unpaid,
    unpaid_balances, unpaid_by_employee,
};
pub use export::{
    ExportRow, HEADER, UNKNOWN_EMPLOYEE, UTF8_BOM, export_file_name, export_rows, to_csv_bytes,
    write_csv,
};
