//! Payroll ledger for hourly and piece-rate workers.
//!
//! This crate records work, computes the pay earned for each unit of work
//! under a configurable rate schedule, tracks paid/unpaid status through
//! batch settlements, and aggregates totals for reporting and CSV export.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reporting;
pub mod settlement;
pub mod store;
