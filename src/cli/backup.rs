//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::TallyPaths;
use crate::config::settings::Settings;
use crate::error::TallyResult;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific backup
    Info {
        /// Backup filename or path
        backup: String,
    },

    /// Delete old backups according to retention policy
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &TallyPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> TallyResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: tally backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = manager.resolve(&backup)?;
            let restore_manager = RestoreManager::new(paths.clone());
            let archive = restore_manager.validate_backup(&backup_path)?;

            println!("Backup: {}", backup_path.display());
            println!(
                "Created: {}",
                archive.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!(
                "Contains: {} users, {} transactions",
                archive.users.len(),
                archive.transactions.len()
            );
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  tally backup restore {} --force", backup);
                return Ok(());
            }

            if settings.auto_backup {
                let pre_restore = manager.create_backup()?;
                println!("Current data saved to: {}", pre_restore.display());
            }

            let result = restore_manager.restore_from_archive(&archive)?;
            println!("{}", result.summary());
        }

        BackupCommands::Info { backup } => {
            let backup_path = manager.resolve(&backup)?;
            let archive = RestoreManager::new(paths.clone()).validate_backup(&backup_path)?;
            let metadata = std::fs::metadata(&backup_path)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", backup_path.display());
            println!("Size: {}", format_size(metadata.len()));
            println!(
                "Created: {}",
                archive.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Schema version: {}", archive.schema_version);
            println!();
            println!("Contents:");
            println!("  Users:           {}", archive.users.len());
            println!("  Transactions:    {}", archive.transactions.len());
            println!(
                "  Budget limits:   {}",
                archive
                    .users
                    .iter()
                    .map(|u| archive.budgets.for_user(u.id).len())
                    .sum::<usize>()
            );
            println!(
                "  Goals:           {}",
                archive
                    .users
                    .iter()
                    .map(|u| archive.goals.for_user(u.id).len())
                    .sum::<usize>()
            );
            println!(
                "  Recurring rules: {}",
                archive.recurring.values().map(Vec::len).sum::<usize>()
            );
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let keep = settings.backup_retention.max_backups as usize;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Keeping up to {} backup(s); you have {}.",
                    keep,
                    backups.len()
                );
                return Ok(());
            }

            println!(
                "{} of {} backup(s) exceed the retention limit of {}.",
                to_delete,
                backups.len(),
                keep
            );

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  tally backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_duration(chrono::Duration::hours(3)), "3h");
        assert_eq!(format_duration(chrono::Duration::days(2)), "2d");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
