//! Audit logging
//!
//! Every create, update and delete of a user, transaction, recurring rule,
//! budget limit or goal is appended to `audit.log` as one JSON line with
//! before/after snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_cli::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(
//!     EntityType::Transaction,
//!     txn.id.to_string(),
//!     Some(txn.category.clone()),
//!     &txn,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
