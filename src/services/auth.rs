//! User registration and login
//!
//! PINs are hashed with Argon2id and stored as PHC strings. The session
//! marker is written on register/login and removed on logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Session, User};
use crate::storage::Storage;

pub const MIN_PIN_LEN: usize = 4;
pub const MAX_PIN_LEN: usize = 8;

/// Service for users and the login marker
pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a user and log them in
    pub fn register(&self, name: &str, pin: &str, currency: &str) -> TallyResult<Session> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TallyError::Validation("Name must not be empty".into()));
        }
        validate_pin(pin)?;

        if self.storage.users.find_by_name(name)?.is_some() {
            return Err(TallyError::Duplicate {
                entity_type: "User",
                identifier: name.to_string(),
            });
        }

        let user = User::new(name, hash_pin(pin)?, currency.trim().to_uppercase());

        let mut users = self.storage.users.get_all()?;
        users.push(user.clone());
        self.storage.users.commit(users)?;

        let session = user.session();
        self.storage.session.save(&session)?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &serde_json::json!({ "name": user.name, "currency": user.currency }),
        )?;
        info!(user = %user.id, "registered user");

        Ok(session)
    }

    /// Verify credentials and write the session marker
    ///
    /// Unknown names and wrong PINs fail the same way.
    pub fn login(&self, name: &str, pin: &str) -> TallyResult<Session> {
        let user = self
            .storage
            .users
            .find_by_name(name)?
            .ok_or(TallyError::Authentication)?;

        if !verify_pin(pin, &user.pin_hash) {
            debug!(user = %user.id, "PIN mismatch");
            return Err(TallyError::Authentication);
        }

        let session = user.session();
        self.storage.session.save(&session)?;
        info!(user = %user.id, "logged in");
        Ok(session)
    }

    /// Remove the session marker; returns whether anyone was logged in
    pub fn logout(&self) -> TallyResult<bool> {
        self.storage.session.clear()
    }

    /// The stored session, if it still names an existing user
    pub fn current_session(&self) -> TallyResult<Option<Session>> {
        let Some(session) = self.storage.session.load()? else {
            return Ok(None);
        };
        match self.storage.users.get(session.user_id)? {
            Some(user) => Ok(Some(user.session())),
            None => Ok(None),
        }
    }

    pub fn user(&self, session: &Session) -> TallyResult<User> {
        self.storage
            .users
            .get(session.user_id)?
            .ok_or_else(|| TallyError::user_not_found(session.user_id.to_string()))
    }
}

/// PINs are 4 to 8 ASCII digits
pub fn validate_pin(pin: &str) -> TallyResult<()> {
    let len_ok = (MIN_PIN_LEN..=MAX_PIN_LEN).contains(&pin.len());
    if !len_ok || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TallyError::Validation(format!(
            "PIN must be {} to {} digits",
            MIN_PIN_LEN, MAX_PIN_LEN
        )));
    }
    Ok(())
}

pub fn hash_pin(pin: &str) -> TallyResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TallyError::Storage(format!("Failed to hash PIN: {}", e)))
}

/// A malformed stored hash never verifies
pub fn verify_pin(pin: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(pin.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
