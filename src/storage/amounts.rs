//! Repository for per-user amount tables (budgets.json, goals.json)

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::AmountTable;

use super::file_io::{read_json, write_json_atomic};

pub struct AmountRepository {
    path: PathBuf,
    data: RwLock<AmountTable>,
}

impl AmountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(AmountTable::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let table: AmountTable = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = table;

        Ok(())
    }

    /// A copy of the whole table for read-modify-commit
    pub fn snapshot(&self) -> Result<AmountTable, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Write `table` to disk, then make it the in-memory state
    pub fn commit(&self, table: AmountTable) -> Result<(), TallyError> {
        write_json_atomic(&self.path, &table)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = table;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, UserId};
    use tempfile::TempDir;

    #[test]
    fn test_commit_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = AmountRepository::new(path.clone());
        repo.load().unwrap();
        assert!(repo.snapshot().unwrap().is_empty());

        let user = UserId::new();
        let mut table = repo.snapshot().unwrap();
        table.set(user, "Food", Money::from_units(500)).unwrap();
        repo.commit(table).unwrap();

        let reloaded = AmountRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(
            reloaded.snapshot().unwrap().get(user, "Food"),
            Some(Money::from_units(500))
        );
    }
}
