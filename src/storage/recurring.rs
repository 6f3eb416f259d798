//! Recurring rule repository for JSON storage
//!
//! recurring.json maps each user id to that user's list of rules.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{RecurringRule, UserId};

use super::file_io::{read_json, write_json_atomic};

pub type RecurringTable = HashMap<UserId, Vec<RecurringRule>>;

pub struct RecurringRepository {
    path: PathBuf,
    data: RwLock<RecurringTable>,
}

impl RecurringRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let table: RecurringTable = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = table;

        Ok(())
    }

    pub fn snapshot(&self) -> Result<RecurringTable, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// One user's rules in the order they were added
    pub fn get_for_user(&self, user_id: UserId) -> Result<Vec<RecurringRule>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&user_id).cloned().unwrap_or_default())
    }

    /// Replace one user's rules on disk, then in memory
    ///
    /// An empty list drops the user's entry.
    pub fn commit_for_user(
        &self,
        user_id: UserId,
        rules: Vec<RecurringRule>,
    ) -> Result<(), TallyError> {
        let mut table = self.snapshot()?;
        if rules.is_empty() {
            table.remove(&user_id);
        } else {
            table.insert(user_id, rules);
        }
        self.commit(table)
    }

    pub fn commit(&self, table: RecurringTable) -> Result<(), TallyError> {
        write_json_atomic(&self.path, &table)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = table;

        Ok(())
    }
}
