//! CLI commands for reports
//!
//! Dashboard, monthly totals, category breakdown and spending trends for the
//! logged-in user, plus the financial health score.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::dates::{parse_optional_date, today};
use crate::display::format_health_score;
use crate::error::TallyResult;
use crate::models::Session;
use crate::reports::{CategoryBreakdown, DashboardSummary, MonthlyReport, SpendingTrends};
use crate::services::{HealthService, TransactionService};
use crate::storage::Storage;

use super::{ensure_feature, parse_kind};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// This month's income, expenses and top spending categories
    Dashboard {
        /// Report as of this date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },

    /// Income, expense and net per month
    Monthly,

    /// Totals per category
    #[command(alias = "category")]
    Categories {
        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,
    },

    /// Month-over-month change in spending
    Trends,
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: ReportCommands,
) -> TallyResult<()> {
    let transactions = TransactionService::new(storage).list(session)?;
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Dashboard { today: as_of } => {
            let as_of = parse_optional_date(as_of.as_deref(), "date")?.unwrap_or_else(today);
            let summary = DashboardSummary::generate(&transactions, as_of);
            print!("{}", summary.format_terminal(symbol));
        }

        ReportCommands::Monthly => {
            let report = MonthlyReport::generate(&transactions);
            print!("{}", report.format_terminal(symbol));
        }

        ReportCommands::Categories { kind } => {
            let breakdown = CategoryBreakdown::generate(&transactions, parse_kind(&kind)?);
            print!("{}", breakdown.format_terminal(symbol));
        }

        ReportCommands::Trends => {
            let trends = SpendingTrends::generate(&transactions);
            print!("{}", trends.format_terminal(symbol));
        }
    }

    Ok(())
}

/// Print the financial health score
pub fn handle_health_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
) -> TallyResult<()> {
    ensure_feature(settings.features.enable_goals, "Goals")?;
    let score = HealthService::new(storage).score(session)?;
    print!("{}", format_health_score(score));
    Ok(())
}
