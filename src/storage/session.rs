//! Login marker (session.json)
//!
//! The file only records who logged in last. It is read once at startup to
//! build a [`Session`] value; nothing else consults it.

use std::path::PathBuf;

use crate::error::TallyError;
use crate::models::Session;

use super::file_io::{read_json_required, remove_if_exists, write_json_atomic};

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The stored session, or `None` when logged out
    pub fn load(&self) -> Result<Option<Session>, TallyError> {
        if !self.path.exists() {
            return Ok(None);
        }
        read_json_required(&self.path).map(Some)
    }

    pub fn save(&self, session: &Session) -> Result<(), TallyError> {
        write_json_atomic(&self.path, session)
    }

    /// Remove the marker; returns whether anyone was logged in
    pub fn clear(&self) -> Result<bool, TallyError> {
        remove_if_exists(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use tempfile::TempDir;

    #[test]
    fn test_session_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);

        let session = Session::new(UserId::new(), "Mona");
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }
}
