//! Threshold model for SAP Cloud Connector subaccount monitoring.
//!
//! Pure logic, no I/O: four-point threshold rules per metric, built-in
//! defaults, per-subaccount overrides published as atomic snapshots, and an
//! evaluator that turns samples into OK/WARN/CRIT verdicts.

pub mod config;
pub mod defaults;
pub mod error;
pub mod evaluator;
pub mod metric_names;
pub mod report;
pub mod rule;
pub mod set;
pub mod store;
pub mod types;
pub mod verdict;
