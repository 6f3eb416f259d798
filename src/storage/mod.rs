//! Storage layer for Tally
//!
//! Flat JSON files under the data directory, one repository per file. Every
//! mutating operation writes the new state to disk before replacing the
//! in-memory copy, so a failed save leaves memory as it was. There is no
//! cross-process locking; the last writer wins.

pub mod amounts;
pub mod file_io;
pub mod recurring;
pub mod session;
pub mod transactions;
pub mod users;

pub use amounts::AmountRepository;
pub use file_io::{read_json, write_json_atomic};
pub use recurring::{RecurringRepository, RecurringTable};
pub use session::SessionStore;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TallyPaths;
use crate::error::TallyError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    pub users: UserRepository,
    pub transactions: TransactionRepository,
    pub budgets: AmountRepository,
    pub goals: AmountRepository,
    pub recurring: RecurringRepository,
    pub session: SessionStore,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: AmountRepository::new(paths.budgets_file()),
            goals: AmountRepository::new(paths.goals_file()),
            recurring: RecurringRepository::new(paths.recurring_file()),
            session: SessionStore::new(paths.session_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    /// Load all data files from disk
    pub fn load_all(&self) -> Result<(), TallyError> {
        self.users.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        self.recurring.load()?;
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize + ?Sized>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize + ?Sized>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), TallyError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize + ?Sized>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
