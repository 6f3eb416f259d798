//! Transaction service
//!
//! Add, list, edit and delete a user's transactions. Every operation reads
//! the current state, validates, and only then writes.

use chrono::NaiveDate;
use tracing::debug;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Session, Transaction, TransactionKind};
use crate::storage::Storage;

use super::search::{SearchRequest, TransactionQuery};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
    pub payment_method: String,
}

/// Fields to change on an existing transaction; `None` keeps the old value
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
}

impl UpdateTransactionInput {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.payment_method.is_none()
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        session: &Session,
        input: CreateTransactionInput,
    ) -> TallyResult<Transaction> {
        let txn = Transaction::new(
            session.user_id,
            input.kind,
            input.amount,
            input.category,
            input.date,
        )
        .with_description(input.description.trim())
        .with_payment_method(input.payment_method.trim());

        txn.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        let mut transactions = self.storage.transactions.get_all()?;
        transactions.push(txn.clone());
        self.storage.transactions.commit(transactions)?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.category)),
            &txn,
        )?;

        Ok(txn)
    }

    /// The session user's transactions in insertion order
    pub fn list(&self, session: &Session) -> TallyResult<Vec<Transaction>> {
        self.storage.transactions.get_for_user(session.user_id)
    }

    /// Find one of the session user's transactions by full or short id
    pub fn get(&self, session: &Session, identifier: &str) -> TallyResult<Transaction> {
        self.storage
            .transactions
            .find_for_user(session.user_id, identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))
    }

    /// Run a raw search request against the session user's transactions
    ///
    /// The request's user id is always taken from the session.
    pub fn search(
        &self,
        session: &Session,
        mut request: SearchRequest,
    ) -> TallyResult<Vec<Transaction>> {
        request.user_id = session.user_id.to_string();
        let query = request.validate()?;
        self.query(&query)
    }

    pub fn query(&self, query: &TransactionQuery) -> TallyResult<Vec<Transaction>> {
        let transactions = self.storage.transactions.get_for_user(query.user_id)?;
        let results = query.apply(&transactions);
        debug!(
            user = %query.user_id,
            matched = results.len(),
            scanned = transactions.len(),
            "search complete"
        );
        Ok(results)
    }

    /// Apply changes to a transaction, re-validating the result
    pub fn update(
        &self,
        session: &Session,
        identifier: &str,
        input: UpdateTransactionInput,
    ) -> TallyResult<Transaction> {
        let mut transactions = self.storage.transactions.get_all()?;
        let index = transactions
            .iter()
            .position(|t| t.user_id == session.user_id && t.id.matches(identifier))
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;

        let before = transactions[index].clone();
        let mut txn = before.clone();

        if let Some(kind) = input.kind {
            txn.kind = kind;
        }
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(category) = input.category {
            txn.category = category.trim().to_string();
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(payment_method) = input.payment_method {
            txn.payment_method = payment_method.trim().to_string();
        }

        txn.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        if txn == before {
            return Ok(txn);
        }

        transactions[index] = txn.clone();
        self.storage.transactions.commit(transactions)?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.category)),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    pub fn delete(&self, session: &Session, identifier: &str) -> TallyResult<Transaction> {
        let mut transactions = self.storage.transactions.get_all()?;
        let index = transactions
            .iter()
            .position(|t| t.user_id == session.user_id && t.id.matches(identifier))
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;

        let txn = transactions.remove(index);
        self.storage.transactions.commit(transactions)?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.category)),
            &txn,
        )?;

        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::TallyPaths;
    use crate::models::UserId;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, Session) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage, Session::new(UserId::new(), "Mona"))
    }

    fn groceries(cents: i64) -> CreateTransactionInput {
        CreateTransactionInput {
            kind: TransactionKind::Expense,
            amount: Money::from_cents(cents),
            category: "Groceries".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            description: " weekly shop ".into(),
            payment_method: "card".into(),
        }
    }

    #[test]
    fn test_create_and_list() {
        let (_temp, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service.create(&session, groceries(4599)).unwrap();
        assert_eq!(txn.user_id, session.user_id);
        assert_eq!(txn.description, "weekly shop");

        assert_eq!(service.list(&session).unwrap(), vec![txn.clone()]);
        assert_eq!(service.get(&session, &txn.id.short()).unwrap(), txn);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
    }

    #[test]
    fn test_create_rejects_invalid_without_writing() {
        let (temp, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service.create(&session, groceries(0)).unwrap_err();
        assert!(err.is_validation());

        let mut input = groceries(100);
        input.category = "  ".into();
        assert!(service.create(&session, input).unwrap_err().is_validation());

        assert!(!temp.path().join("data/transactions.json").exists());
    }

    #[test]
    fn test_update_revalidates() {
        let (_temp, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(&session, groceries(4599)).unwrap();

        let bad = UpdateTransactionInput {
            amount: Some(Money::from_cents(-5)),
            ..Default::default()
        };
        assert!(service.update(&session, &txn.id.short(), bad).unwrap_err().is_validation());
        assert_eq!(service.get(&session, &txn.id.short()).unwrap(), txn);

        let good = UpdateTransactionInput {
            category: Some("Dining".into()),
            kind: Some(TransactionKind::Income),
            ..Default::default()
        };
        let updated = service.update(&session, &txn.id.short(), good).unwrap();
        assert_eq!(updated.category, "Dining");
        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.id, txn.id);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.last().unwrap().operation, Operation::Update);
    }

    #[test]
    fn test_other_users_transactions_are_invisible() {
        let (_temp, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(&session, groceries(4599)).unwrap();

        let stranger = Session::new(UserId::new(), "Omar");
        assert!(service.list(&stranger).unwrap().is_empty());
        assert!(service.get(&stranger, &txn.id.to_string()).unwrap_err().is_not_found());
        assert!(service.delete(&stranger, &txn.id.to_string()).unwrap_err().is_not_found());
        assert_eq!(service.list(&session).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);
        let first = service.create(&session, groceries(100)).unwrap();
        let second = service.create(&session, groceries(200)).unwrap();

        service.delete(&session, &first.id.to_string()).unwrap();
        assert_eq!(service.list(&session).unwrap(), vec![second]);
    }

    #[test]
    fn test_search_uses_session_user() {
        let (_temp, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);
        service.create(&session, groceries(100)).unwrap();

        let mut request = SearchRequest::for_user(UserId::new().to_string());
        request.category = Some("groceries".into());
        assert_eq!(service.search(&session, request).unwrap().len(), 1);
    }
}
