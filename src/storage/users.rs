//! User repository for JSON storage

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Repository for registered users, stored as a top-level array
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<Vec<User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let users: Vec<User> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = users;

        Ok(())
    }

    /// Write `users` to disk, then make them the in-memory state
    pub fn commit(&self, users: Vec<User>) -> Result<(), TallyError> {
        write_json_atomic(&self.path, &users)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = users;

        Ok(())
    }

    pub fn get_all(&self) -> Result<Vec<User>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|u| u.id == id).cloned())
    }

    /// Case-insensitive lookup by name
    pub fn find_by_name(&self, name: &str) -> Result<Option<User>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|u| u.has_name(name)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_and_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        repo.load().unwrap();

        let user = User::new("Mona", "hash".into(), "EGP");
        repo.commit(vec![user.clone()]).unwrap();

        assert_eq!(repo.find_by_name("MONA").unwrap().unwrap().id, user.id);
        assert!(repo.get(user.id).unwrap().is_some());
        assert!(repo.find_by_name("Omar").unwrap().is_none());

        let reloaded = UserRepository::new(temp_dir.path().join("users.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_all().unwrap().len(), 1);
    }
}
