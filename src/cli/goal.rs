//! Goal CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_amount_list, format_goal_progress};
use crate::error::TallyResult;
use crate::models::Session;
use crate::services::GoalService;
use crate::storage::Storage;

use super::{ensure_feature, parse_amount};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Set (or replace) a savings goal
    Set {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
    },
    /// Remove a goal
    Remove {
        /// Goal name
        name: String,
    },
    /// List all goals
    List,
    /// Show progress toward every goal
    Progress,
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    session: &Session,
    cmd: GoalCommands,
) -> TallyResult<()> {
    ensure_feature(settings.features.enable_goals, "Goals")?;

    let service = GoalService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Set { name, target } => {
            let target = parse_amount(&target)?;
            let previous = service.set(session, &name, target)?;
            let verb = if previous.is_some() { "Updated" } else { "Set" };
            println!(
                "{} goal '{}': {}",
                verb,
                name.trim(),
                target.format_with_symbol(symbol)
            );
        }

        GoalCommands::Remove { name } => {
            let removed = service.remove(session, &name)?;
            println!(
                "Removed goal '{}' (target was {})",
                name.trim(),
                removed.format_with_symbol(symbol)
            );
        }

        GoalCommands::List => {
            let goals = service.list(session)?;
            print!("{}", format_amount_list("Goals", &goals, symbol));
        }

        GoalCommands::Progress => {
            let progress = service.progress(session)?;
            print!("{}", format_goal_progress(&progress, symbol));
        }
    }

    Ok(())
}
