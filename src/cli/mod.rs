//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod budget;
pub mod export;
pub mod goal;
pub mod menu;
pub mod recurring;
pub mod report;
pub mod transaction;
pub mod user;

pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, ExportArgs};
pub use goal::{handle_goal_command, GoalCommands};
pub use menu::run_menu;
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use report::{handle_health_command, handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, UserCommands};

use tracing::warn;

use crate::backup::BackupManager;
use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Session, TransactionKind};
use crate::services::AuthService;
use crate::storage::Storage;

/// The active session, or `NotLoggedIn`
pub fn require_session(storage: &Storage) -> TallyResult<Session> {
    AuthService::new(storage)
        .current_session()?
        .ok_or(TallyError::NotLoggedIn)
}

/// Parse a positive amount typed by the user
pub fn parse_amount(input: &str) -> TallyResult<Money> {
    let amount = Money::parse(input).map_err(|e| {
        TallyError::Validation(format!(
            "Invalid amount: {}. Use a format like '50' or '12.99'",
            e
        ))
    })?;
    if !amount.is_positive() {
        return Err(TallyError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}

pub fn parse_kind(input: &str) -> TallyResult<TransactionKind> {
    input
        .parse()
        .map_err(|e| TallyError::Validation(format!("{}", e)))
}

/// Take a backup before a destructive change when auto-backup is on
///
/// A failed backup is logged and does not block the change.
pub fn auto_backup(storage: &Storage, settings: &Settings) {
    if !settings.auto_backup {
        return;
    }
    let manager = BackupManager::new(storage.paths().clone(), settings.backup_retention.clone());
    if let Err(e) = manager.create_backup_with_retention() {
        warn!(error = %e, "automatic backup failed");
    }
}

/// Error out when a feature has been switched off in settings
pub fn ensure_feature(enabled: bool, name: &str) -> TallyResult<()> {
    if enabled {
        Ok(())
    } else {
        Err(TallyError::Config(format!(
            "{} are disabled in config.json",
            name
        )))
    }
}
