//! Core data models for the payroll ledger.
//!
//! This module contains all the domain models used throughout the ledger.

mod employee;
mod payout;
mod settings;
mod work_record;

pub use employee::{Employee, EmployeePatch};
pub use payout::{Payout, PendingSettlement, UnpaidBalance};
pub use settings::Settings;
pub use work_record::{RecordPatch, WorkKind, WorkRecord, WorkRecordDraft};
