//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. The file is
//! a top-level JSON array kept in insertion order.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Transaction, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<Vec<Transaction>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load transactions from disk, replacing whatever is in memory
    pub fn load(&self) -> Result<(), TallyError> {
        let transactions: Vec<Transaction> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = transactions;

        Ok(())
    }

    /// Save the in-memory transactions to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(&self.path, &*data)
    }

    /// Write `transactions` to disk, then make them the in-memory state
    ///
    /// If the write fails the in-memory state is left untouched.
    pub fn commit(&self, transactions: Vec<Transaction>) -> Result<(), TallyError> {
        write_json_atomic(&self.path, &transactions)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = transactions;

        Ok(())
    }

    /// Get all transactions in insertion order
    pub fn get_all(&self) -> Result<Vec<Transaction>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Get one user's transactions in insertion order
    pub fn get_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    /// Find a user's transaction by full or short id
    pub fn find_for_user(
        &self,
        user_id: UserId,
        identifier: &str,
    ) -> Result<Option<Transaction>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .find(|t| t.user_id == user_id && t.id.matches(identifier))
            .cloned())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
