//! Export module for Tally
//!
//! - CSV: the user's transactions, spreadsheet-compatible
//! - JSON / YAML: transactions plus budgets, goals and recurring rules

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_transactions_csv;
pub use json::{export_json, ExportMetadata, UserExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;
