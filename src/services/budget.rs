//! Budget limits and overspending alerts

use std::collections::BTreeMap;

use tracing::debug;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Session, Transaction, UserId};
use crate::storage::Storage;

/// A category whose spending is over its limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub category: String,
    pub spent: Money,
    pub limit: Money,
    pub over_by: Money,
}

/// Compare lifetime expenses per category against the limits
///
/// Categories match exactly. Spending equal to the limit is not an alert.
pub fn check_budgets(
    user_id: UserId,
    transactions: &[Transaction],
    limits: &BTreeMap<String, Money>,
) -> Vec<BudgetAlert> {
    limits
        .iter()
        .filter_map(|(category, &limit)| {
            let spent: Money = transactions
                .iter()
                .filter(|t| t.user_id == user_id && t.is_expense() && &t.category == category)
                .map(|t| t.amount)
                .sum();

            (spent > limit).then(|| BudgetAlert {
                category: category.clone(),
                spent,
                limit,
                over_by: spent - limit,
            })
        })
        .collect()
}

/// Service for per-category budget limits
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set or overwrite a limit, returning the previous one
    pub fn set(&self, session: &Session, category: &str, limit: Money) -> TallyResult<Option<Money>> {
        let mut table = self.storage.budgets.snapshot()?;
        let previous = table
            .set(session.user_id, category, limit)
            .map_err(|e| TallyError::Validation(e.to_string()))?;
        self.storage.budgets.commit(table)?;

        let name = Some(category.trim().to_string());
        match previous {
            Some(old) => self.storage.log_update(
                EntityType::Budget,
                session.user_id.to_string(),
                name,
                &serde_json::json!({ "limit": old }),
                &serde_json::json!({ "limit": limit }),
            )?,
            None => self.storage.log_create(
                EntityType::Budget,
                session.user_id.to_string(),
                name,
                &serde_json::json!({ "limit": limit }),
            )?,
        }

        Ok(previous)
    }

    pub fn remove(&self, session: &Session, category: &str) -> TallyResult<Money> {
        let mut table = self.storage.budgets.snapshot()?;
        let removed = table
            .remove(session.user_id, category)
            .ok_or_else(|| TallyError::budget_not_found(category.trim()))?;
        self.storage.budgets.commit(table)?;

        self.storage.log_delete(
            EntityType::Budget,
            session.user_id.to_string(),
            Some(category.trim().to_string()),
            &serde_json::json!({ "limit": removed }),
        )?;

        Ok(removed)
    }

    /// Limits sorted by category
    pub fn list(&self, session: &Session) -> TallyResult<BTreeMap<String, Money>> {
        Ok(self.storage.budgets.snapshot()?.for_user(session.user_id))
    }

    pub fn check(&self, session: &Session) -> TallyResult<Vec<BudgetAlert>> {
        let limits = self.list(session)?;
        let transactions = self.storage.transactions.get_for_user(session.user_id)?;
        let alerts = check_budgets(session.user_id, &transactions, &limits);
        debug!(
            user = %session.user_id,
            budgets = limits.len(),
            alerts = alerts.len(),
            "checked budgets"
        );
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn expense(user: UserId, category: &str, units: i64) -> Transaction {
        Transaction::new(
            user,
            TransactionKind::Expense,
            Money::from_units(units),
            category,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        )
    }

    fn limits(category: &str, units: i64) -> BTreeMap<String, Money> {
        BTreeMap::from([(category.to_string(), Money::from_units(units))])
    }

    #[test]
    fn test_over_budget_alert() {
        let user = UserId::new();
        let txns = vec![expense(user, "Food", 400), expense(user, "Food", 220)];

        let alerts = check_budgets(user, &txns, &limits("Food", 500));
        assert_eq!(
            alerts,
            vec![BudgetAlert {
                category: "Food".into(),
                spent: Money::from_units(620),
                limit: Money::from_units(500),
                over_by: Money::from_units(120),
            }]
        );
    }

    #[test]
    fn test_spent_equal_to_limit_is_not_an_alert() {
        let user = UserId::new();
        let txns = vec![expense(user, "Food", 500)];
        assert!(check_budgets(user, &txns, &limits("Food", 500)).is_empty());
    }

    #[test]
    fn test_only_matching_expenses_count() {
        let user = UserId::new();
        let other = UserId::new();
        let mut income = expense(user, "Food", 1000);
        income.kind = TransactionKind::Income;
        let txns = vec![
            income,
            expense(other, "Food", 1000),
            expense(user, "food", 1000),
            expense(user, "Food", 100),
        ];

        assert!(check_budgets(user, &txns, &limits("Food", 500)).is_empty());
    }

    #[test]
    fn test_service_set_overwrite_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        let session = Session::new(UserId::new(), "Mona");
        let service = BudgetService::new(&storage);

        assert_eq!(service.set(&session, "Food", Money::from_units(500)).unwrap(), None);
        assert_eq!(
            service.set(&session, "Food", Money::from_units(650)).unwrap(),
            Some(Money::from_units(500))
        );
        assert!(service.set(&session, "Rent", Money::zero()).unwrap_err().is_validation());
        assert_eq!(service.list(&session).unwrap(), limits("Food", 650));

        assert!(service.remove(&session, "Rent").unwrap_err().is_not_found());
        assert_eq!(service.remove(&session, "Food").unwrap(), Money::from_units(650));
        assert!(service.list(&session).unwrap().is_empty());
    }
}
