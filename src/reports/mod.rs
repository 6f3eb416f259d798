//! Reports for Tally
//!
//! Pure aggregations over one user's transactions: the monthly dashboard,
//! per-month totals, category breakdowns and month-over-month trends. None
//! of them touch storage.

pub mod categories;
pub mod dashboard;
pub mod monthly;
pub mod trends;

pub use categories::CategoryBreakdown;
pub use dashboard::{CategoryShare, DashboardSummary};
pub use monthly::{MonthTotals, MonthlyReport};
pub use trends::{SpendingTrends, TrendEntry};
