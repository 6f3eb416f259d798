//! Display formatting for terminal output
//!
//! Turns models and evaluator results into tables and text blocks. Reports
//! format themselves; see [`crate::reports`].

pub mod report;
pub mod transaction;

pub use report::{
    format_amount_list, format_budget_alerts, format_goal_progress, format_health_score,
};
pub use transaction::{format_rule_table, format_transaction_details, format_transaction_table};
