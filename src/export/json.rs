//! JSON Export functionality
//!
//! Exports one user's data with schema versioning.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TallyError, TallyResult};
use crate::models::{Money, RecurringRule, Session, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything that belongs to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user: String,

    pub transactions: Vec<Transaction>,

    /// Category -> limit
    pub budgets: BTreeMap<String, Money>,

    /// Goal name -> target
    pub goals: BTreeMap<String, Money>,

    pub recurring: Vec<RecurringRule>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,
}

impl UserExport {
    /// Build an export around the given transactions (all of them, or a
    /// search result)
    pub fn new(
        storage: &Storage,
        session: &Session,
        transactions: Vec<Transaction>,
    ) -> TallyResult<Self> {
        let budgets = storage.budgets.snapshot()?.for_user(session.user_id);
        let goals = storage.goals.snapshot()?.for_user(session.user_id);
        let recurring = storage.recurring.get_for_user(session.user_id)?;

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user: session.name.clone(),
            transactions,
            budgets,
            goals,
            recurring,
            metadata,
        })
    }
}

pub fn export_json<W: Write>(export: &UserExport, writer: &mut W) -> TallyResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| TallyError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TallyError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{TransactionKind, UserId};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_export_json() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        let session = Session::new(UserId::new(), "Mona");

        let mut budgets = storage.budgets.snapshot().unwrap();
        budgets.set(session.user_id, "Food", Money::from_units(500)).unwrap();
        storage.budgets.commit(budgets).unwrap();

        let txns = vec![
            Transaction::new(
                session.user_id,
                TransactionKind::Expense,
                Money::from_cents(1250),
                "Food",
                NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            ),
            Transaction::new(
                session.user_id,
                TransactionKind::Income,
                Money::from_units(3000),
                "Salary",
                NaiveDate::from_ymd_opt(2025, 1, 28).unwrap(),
            ),
        ];

        let export = UserExport::new(&storage, &session, txns).unwrap();
        let mut output = Vec::new();
        export_json(&export, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["user"], "Mona");
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["budgets"]["Food"], 50000);
        assert_eq!(value["metadata"]["transaction_count"], 2);
        assert_eq!(value["metadata"]["earliest_transaction"], "2025-01-28");
        assert_eq!(value["metadata"]["latest_transaction"], "2025-02-03");
    }
}
