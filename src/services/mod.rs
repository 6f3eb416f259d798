//! Service layer for Tally
//!
//! Services sit on top of the storage layer. They validate input, act on
//! behalf of an explicit [`Session`](crate::models::Session), write the audit
//! trail, and hold the pure evaluators (search, recurrence, budgets, goals,
//! health score) that the services and reports share.

pub mod auth;
pub mod budget;
pub mod goal;
pub mod health;
pub mod recurring;
pub mod search;
pub mod transaction;

pub use auth::AuthService;
pub use budget::{check_budgets, BudgetAlert, BudgetService};
pub use goal::{goal_progress, net_savings, GoalProgress, GoalService, GoalStatus};
pub use health::{financial_health_score, savings_ratio, HealthService};
pub use recurring::{process_due_rules, CreateRuleInput, RecurringService};
pub use search::{SearchRequest, SortKey, SortOrder, TransactionQuery};
pub use transaction::{CreateTransactionInput, TransactionService, UpdateTransactionInput};
