//! Core data models for Tally
//!
//! This module contains the data structures of the finance domain: users,
//! transactions, recurring rules, budget limits and savings goals.

pub mod amounts;
pub mod ids;
pub mod money;
pub mod recurring;
pub mod transaction;
pub mod user;

pub use amounts::{AmountError, AmountTable, BudgetTable, GoalTable};
pub use ids::{IdParseError, RecurringRuleId, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use recurring::{RecurringRule, RecurringRuleError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
pub use user::{Session, User};
