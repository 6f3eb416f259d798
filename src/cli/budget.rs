//! Budget CLI commands
//!
//! Per-category spending limits and the over-budget check.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_amount_list, format_budget_alerts};
use crate::error::TallyResult;
use crate::models::Session;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{ensure_feature, parse_amount};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set (or replace) the limit for a category
    Set {
        /// Category name, matched exactly
        category: String,
        /// Spending limit
        limit: String,
    },
    /// Remove a category's limit
    Remove {
        /// Category name
        category: String,
    },
    /// List all limits
    List,
    /// Report categories whose spending is over the limit
    Check,
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: BudgetCommands,
) -> TallyResult<()> {
    ensure_feature(settings.features.enable_budgets, "Budgets")?;

    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set { category, limit } => {
            let limit = parse_amount(&limit)?;
            let previous = service.set(session, &category, limit)?;
            match previous {
                Some(old) => println!(
                    "Updated budget for '{}': {} -> {}",
                    category.trim(),
                    old.format_with_symbol(symbol),
                    limit.format_with_symbol(symbol)
                ),
                None => println!(
                    "Set budget for '{}': {}",
                    category.trim(),
                    limit.format_with_symbol(symbol)
                ),
            }
        }

        BudgetCommands::Remove { category } => {
            let removed = service.remove(session, &category)?;
            println!(
                "Removed budget for '{}' (was {})",
                category.trim(),
                removed.format_with_symbol(symbol)
            );
        }

        BudgetCommands::List => {
            let budgets = service.list(session)?;
            print!("{}", format_amount_list("Budgets", &budgets, symbol));
        }

        BudgetCommands::Check => {
            let alerts = service.check(session)?;
            print!("{}", format_budget_alerts(&alerts, symbol));
        }
    }

    Ok(())
}
