//! Users and the login session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A registered user
///
/// The PIN is only ever stored as an Argon2 PHC hash string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub pin_hash: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, pin_hash: String, currency: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into().trim().to_string(),
            pin_hash,
            currency: currency.into(),
            created_at: Utc::now(),
        }
    }

    /// Names are unique ignoring case
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.id,
            name: self.name.clone(),
        }
    }
}

/// The logged-in user
///
/// Passed explicitly to every operation that acts on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub name: String,
}

impl Session {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_name_ignores_case() {
        let user = User::new("  Mona ", "hash".into(), "EGP");
        assert_eq!(user.name, "Mona");
        assert!(user.has_name("mona"));
        assert!(user.has_name(" MONA"));
        assert!(!user.has_name("monad"));
    }

    #[test]
    fn test_session_from_user() {
        let user = User::new("Mona", "hash".into(), "EGP");
        let session = user.session();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.name, "Mona");
    }
}
