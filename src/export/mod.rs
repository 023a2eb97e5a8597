//! Export module for the finance tracker
//!
//! Provides data export in multiple formats:
//! - CSV: transactions, goals and budgets in their on-disk column order
//! - JSON: machine-readable full snapshot
//! - YAML: human-readable full snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_budgets_csv, export_goals_csv, export_transactions_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
