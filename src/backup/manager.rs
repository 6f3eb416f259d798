//! Backup manager for Tally
//!
//! Each backup is one JSON archive holding every data file, named
//! `backup-YYYYMMDD-HHMMSS-mmm.json`. Only the newest `max_backups` are kept.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::paths::TallyPaths;
use crate::config::settings::BackupRetention;
use crate::error::{TallyError, TallyResult};
use crate::models::{AmountTable, Transaction, User};
use crate::storage::{read_json, RecurringTable};

pub const ARCHIVE_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup on disk
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Backup archive format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
    pub budgets: AmountTable,
    pub goals: AmountTable,
    pub recurring: RecurringTable,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: TallyPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: TallyPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            paths,
            retention,
        }
    }

    /// Write a backup of all data files, returning its path
    pub fn create_backup(&self) -> TallyResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| TallyError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = self.create_archive(now)?;
        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| TallyError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| TallyError::Io(format!("Failed to write backup file: {}", e)))?;

        info!(path = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    fn create_archive(&self, timestamp: DateTime<Utc>) -> TallyResult<BackupArchive> {
        Ok(BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at: timestamp,
            users: read_json(self.paths.users_file())?,
            transactions: read_json(self.paths.transactions_file())?,
            budgets: read_json(self.paths.budgets_file())?,
            goals: read_json(self.paths.goals_file())?,
            recurring: read_json(self.paths.recurring_file())?,
        })
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> TallyResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| TallyError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| TallyError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Delete all but the newest `max_backups` archives
    pub fn enforce_retention(&self) -> TallyResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.max_backups as usize)
        {
            fs::remove_file(&backup.path)
                .map_err(|e| TallyError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    pub fn create_backup_with_retention(&self) -> TallyResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn get_latest_backup(&self) -> TallyResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Resolve "latest", a file name in the backup directory, or a path
    pub fn resolve(&self, name: &str) -> TallyResult<PathBuf> {
        if name == "latest" {
            return self
                .get_latest_backup()?
                .map(|b| b.path)
                .ok_or_else(|| TallyError::NotFound {
                    entity_type: "Backup",
                    identifier: name.to_string(),
                });
        }

        let in_dir = self.backup_dir.join(name);
        if in_dir.exists() {
            return Ok(in_dir);
        }
        let as_path = PathBuf::from(name);
        if as_path.exists() {
            return Ok(as_path);
        }
        Err(TallyError::NotFound {
            entity_type: "Backup",
            identifier: name.to_string(),
        })
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS-mmm` (milliseconds optional)
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let mut parts = stamp.split('-');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let millis: u32 = match parts.next() {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H%M%S").ok()?;
    let time = time.with_nanosecond(millis.checked_mul(1_000_000)?)?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::TempDir;

    fn create_test_manager(max_backups: u32) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let manager = BackupManager::new(paths, BackupRetention { max_backups });
        (manager, temp_dir)
    }

    fn pause() {
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    #[test]
    fn test_create_backup_of_empty_store() {
        let (manager, _temp) = create_test_manager(5);

        let path = manager.create_backup().unwrap();
        let archive: BackupArchive =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(archive.schema_version, ARCHIVE_SCHEMA_VERSION);
        assert!(archive.users.is_empty());
        assert!(archive.transactions.is_empty());
        assert!(archive.budgets.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let (manager, _temp) = create_test_manager(5);

        let first = manager.create_backup().unwrap();
        pause();
        let second = manager.create_backup().unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].path, second);
        assert_eq!(backups[1].path, first);
        assert_eq!(manager.resolve("latest").unwrap(), second);
    }

    #[test]
    fn test_retention_keeps_newest() {
        let (manager, _temp) = create_test_manager(3);

        for _ in 0..5 {
            manager.create_backup().unwrap();
            pause();
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 3);
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let (manager, _temp) = create_test_manager(1);
        fs::write(manager.backup_dir().join("notes.json"), "{}").unwrap();
        manager.create_backup().unwrap();

        assert_eq!(manager.list_backups().unwrap().len(), 1);
        assert!(manager.enforce_retention().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_missing() {
        let (manager, _temp) = create_test_manager(5);
        assert!(manager.resolve("latest").unwrap_err().is_not_found());
        assert!(manager.resolve("backup-nope.json").unwrap_err().is_not_found());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let ts = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 11, 27));
        assert_eq!(ts.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251127-143022").is_some());
        assert!(parse_backup_timestamp("20251127").is_none());
        assert!(parse_backup_timestamp("2025-11-27-1").is_none());
    }
}
