//! Backup restoration for Tally
//!
//! An archive is parsed in full before any data file is touched, so a
//! damaged archive never leaves a half-restored data directory.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::paths::TallyPaths;
use crate::error::{TallyError, TallyResult};
use crate::storage::write_json_atomic;

use super::manager::{BackupArchive, ARCHIVE_SCHEMA_VERSION};

pub struct RestoreManager {
    paths: TallyPaths,
}

impl RestoreManager {
    pub fn new(paths: TallyPaths) -> Self {
        Self { paths }
    }

    /// Parse and check an archive without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> TallyResult<BackupArchive> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| TallyError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| TallyError::Json(format!("Failed to parse backup file: {}", e)))?;

        if archive.schema_version > ARCHIVE_SCHEMA_VERSION {
            return Err(TallyError::Validation(format!(
                "Backup schema version {} is newer than supported version {}",
                archive.schema_version, ARCHIVE_SCHEMA_VERSION
            )));
        }

        Ok(archive)
    }

    /// Overwrite every data file with the archive's contents
    pub fn restore_from_file(&self, backup_path: &Path) -> TallyResult<RestoreResult> {
        let archive = self.validate_backup(backup_path)?;
        self.restore_from_archive(&archive)
    }

    pub fn restore_from_archive(&self, archive: &BackupArchive) -> TallyResult<RestoreResult> {
        self.paths.ensure_directories()?;

        write_json_atomic(self.paths.users_file(), &archive.users)?;
        write_json_atomic(self.paths.transactions_file(), &archive.transactions)?;
        write_json_atomic(self.paths.budgets_file(), &archive.budgets)?;
        write_json_atomic(self.paths.goals_file(), &archive.goals)?;
        write_json_atomic(self.paths.recurring_file(), &archive.recurring)?;

        info!(backup_date = %archive.created_at, "restored backup");

        Ok(RestoreResult {
            backup_date: archive.created_at,
            users: archive.users.len(),
            transactions: archive.transactions.len(),
            recurring_rules: archive.recurring.values().map(Vec::len).sum(),
        })
    }
}

/// What a restore brought back
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub backup_date: DateTime<Utc>,
    pub users: usize,
    pub transactions: usize,
    pub recurring_rules: usize,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        format!(
            "Restored backup from {}: {} users, {} transactions, {} recurring rules",
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC"),
            self.users,
            self.transactions,
            self.recurring_rules
        )
    }
}
