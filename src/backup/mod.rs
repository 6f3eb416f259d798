//! Backup system for Tally
//!
//! - `BackupManager` writes timestamped archives and prunes old ones
//! - `RestoreManager` validates an archive and rewrites the data files from it
//!
//! # Backup Format
//!
//! Backups are single JSON files holding `schema_version`, `created_at` and
//! the full contents of users, transactions, budgets, goals and recurring
//! rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_cli::backup::{BackupManager, RestoreManager};
//!
//! let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());
//! let (backup_path, _pruned) = manager.create_backup_with_retention()?;
//!
//! let result = RestoreManager::new(paths).restore_from_file(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult};
