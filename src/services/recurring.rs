//! Recurring transaction processing
//!
//! Due rules are caught up one interval at a time: every elapsed interval up
//! to and including today produces one transaction dated at its scheduled
//! date, and `next_date` ends strictly after today.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, RecurringRule, Session, Transaction, TransactionKind, UserId};
use crate::storage::Storage;

/// Materialize every due instance of `rules` and advance them in place
///
/// All rules are validated before any is touched, and an error part way
/// through leaves the whole slice unchanged.
pub fn process_due_rules(
    rules: &mut [RecurringRule],
    user_id: UserId,
    today: NaiveDate,
) -> TallyResult<Vec<Transaction>> {
    for rule in rules.iter() {
        rule.validate().map_err(|e| {
            TallyError::Validation(format!("Recurring rule {}: {}", rule.id.short(), e))
        })?;
    }

    let mut advanced = rules.to_vec();
    let mut created = Vec::new();
    for rule in advanced.iter_mut() {
        while rule.is_due(today) {
            created.push(rule.instance_for(user_id));
            rule.advance().map_err(|e| {
                TallyError::Validation(format!("Recurring rule {}: {}", rule.id.short(), e))
            })?;
        }
    }

    rules.clone_from_slice(&advanced);
    Ok(created)
}

/// Input for creating a recurring rule
#[derive(Debug, Clone)]
pub struct CreateRuleInput {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub payment_method: String,
    pub next_date: NaiveDate,
    pub interval_days: u32,
}

/// Service for recurring rules
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn add(&self, session: &Session, input: CreateRuleInput) -> TallyResult<RecurringRule> {
        let rule = RecurringRule::new(
            input.kind,
            input.amount,
            input.category,
            input.next_date,
            input.interval_days,
        )
        .with_description(input.description.trim())
        .with_payment_method(input.payment_method.trim());

        rule.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        let mut rules = self.storage.recurring.get_for_user(session.user_id)?;
        rules.push(rule.clone());
        self.storage.recurring.commit_for_user(session.user_id, rules)?;

        self.storage.log_create(
            EntityType::RecurringRule,
            rule.id.to_string(),
            Some(rule.category.clone()),
            &rule,
        )?;

        Ok(rule)
    }

    pub fn list(&self, session: &Session) -> TallyResult<Vec<RecurringRule>> {
        self.storage.recurring.get_for_user(session.user_id)
    }

    pub fn remove(&self, session: &Session, identifier: &str) -> TallyResult<RecurringRule> {
        let mut rules = self.storage.recurring.get_for_user(session.user_id)?;
        let index = rules
            .iter()
            .position(|r| r.id.matches(identifier))
            .ok_or_else(|| TallyError::rule_not_found(identifier))?;

        let removed = rules.remove(index);
        self.storage.recurring.commit_for_user(session.user_id, rules)?;

        self.storage.log_delete(
            EntityType::RecurringRule,
            removed.id.to_string(),
            Some(removed.category.clone()),
            &removed,
        )?;

        Ok(removed)
    }

    /// Materialize due instances for the session's user as of `today`
    ///
    /// Transactions are saved before the advanced rules. Returns only the
    /// newly created transactions.
    pub fn process(&self, session: &Session, today: NaiveDate) -> TallyResult<Vec<Transaction>> {
        let before = self.storage.recurring.get_for_user(session.user_id)?;
        let mut rules = before.clone();

        let created = process_due_rules(&mut rules, session.user_id, today)?;
        if created.is_empty() {
            debug!(user = %session.user_id, "no recurring rules due");
            return Ok(created);
        }

        let mut transactions = self.storage.transactions.get_all()?;
        transactions.extend(created.iter().cloned());
        self.storage.transactions.commit(transactions)?;
        self.storage
            .recurring
            .commit_for_user(session.user_id, rules.clone())?;

        let mut entries: Vec<AuditEntry> = created
            .iter()
            .map(|t| {
                AuditEntry::create(
                    EntityType::Transaction,
                    t.id.to_string(),
                    Some(t.description.clone()),
                    t,
                )
            })
            .collect();
        entries.extend(
            before
                .iter()
                .zip(rules.iter())
                .filter(|(old, new)| old.next_date != new.next_date)
                .map(|(old, new)| {
                    AuditEntry::update(
                        EntityType::RecurringRule,
                        new.id.to_string(),
                        Some(new.category.clone()),
                        old,
                        new,
                    )
                }),
        );
        self.storage.audit().log_batch(&entries)?;

        info!(
            user = %session.user_id,
            count = created.len(),
            "materialized recurring transactions"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_rent(next_date: NaiveDate) -> RecurringRule {
        RecurringRule::new(
            TransactionKind::Expense,
            Money::from_units(900),
            "Rent",
            next_date,
            30,
        )
        .with_description("Flat")
    }

    #[test]
    fn test_catches_up_missed_intervals() {
        let user = UserId::new();
        let mut rules = vec![monthly_rent(date(2024, 1, 1))];

        let created = process_due_rules(&mut rules, user, date(2024, 3, 15)).unwrap();

        let dates: Vec<_> = created.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 31), date(2024, 3, 1)]
        );
        assert_eq!(rules[0].next_date, date(2024, 3, 31));
        assert!(created.iter().all(|t| t.description == "Recurring: Flat"));
        assert!(created.iter().all(|t| t.user_id == user));
    }

    #[test]
    fn test_second_run_same_day_is_noop() {
        let user = UserId::new();
        let mut rules = vec![monthly_rent(date(2024, 1, 1))];
        let today = date(2024, 3, 15);

        process_due_rules(&mut rules, user, today).unwrap();
        let snapshot = rules.clone();
        let again = process_due_rules(&mut rules, user, today).unwrap();

        assert!(again.is_empty());
        assert_eq!(rules, snapshot);
    }

    #[test]
    fn test_due_today_fires_future_does_not() {
        let user = UserId::new();
        let mut rules = vec![
            monthly_rent(date(2024, 3, 15)),
            monthly_rent(date(2024, 3, 16)),
        ];

        let created = process_due_rules(&mut rules, user, date(2024, 3, 15)).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(rules[0].next_date, date(2024, 4, 14));
        assert_eq!(rules[1].next_date, date(2024, 3, 16));
    }

    #[test]
    fn test_invalid_rule_aborts_before_mutation() {
        let user = UserId::new();
        let mut bad = monthly_rent(date(2024, 1, 1));
        bad.interval_days = 0;
        let mut rules = vec![monthly_rent(date(2024, 1, 1)), bad];
        let snapshot = rules.clone();

        let err = process_due_rules(&mut rules, user, date(2024, 3, 15)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(rules, snapshot);
    }

    #[test]
    fn test_oversized_interval_is_refused() {
        let user = UserId::new();
        let mut huge = monthly_rent(date(2024, 1, 1));
        huge.interval_days = u32::MAX;
        let mut rules = vec![monthly_rent(date(2024, 1, 1)), huge];
        let snapshot = rules.clone();

        let err = process_due_rules(&mut rules, user, date(2024, 3, 15)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(rules, snapshot);
    }

    #[test]
    fn test_calendar_overflow_leaves_rules_unchanged() {
        let user = UserId::new();
        let start = NaiveDate::MAX.checked_sub_days(chrono::Days::new(40)).unwrap();
        let mut rules = vec![monthly_rent(start)];
        let snapshot = rules.clone();

        let err = process_due_rules(&mut rules, user, NaiveDate::MAX).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(rules, snapshot);
    }

    fn create_test_storage() -> (TempDir, Storage, Session) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage, Session::new(UserId::new(), "Mona"))
    }

    fn rent_input(next_date: NaiveDate) -> CreateRuleInput {
        CreateRuleInput {
            kind: TransactionKind::Expense,
            amount: Money::from_units(900),
            category: "Rent".into(),
            description: "Flat".into(),
            payment_method: "transfer".into(),
            next_date,
            interval_days: 30,
        }
    }

    #[test]
    fn test_service_process_persists_both_files() {
        let (temp_dir, storage, session) = create_test_storage();
        let service = RecurringService::new(&storage);
        service.add(&session, rent_input(date(2024, 1, 1))).unwrap();

        let created = service.process(&session, date(2024, 3, 15)).unwrap();
        assert_eq!(created.len(), 3);

        let reloaded =
            Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.transactions.get_for_user(session.user_id).unwrap(), created);
        let rules = reloaded.recurring.get_for_user(session.user_id).unwrap();
        assert_eq!(rules[0].next_date, date(2024, 3, 31));

        let again = RecurringService::new(&reloaded)
            .process(&session, date(2024, 3, 15))
            .unwrap();
        assert!(again.is_empty());
        assert_eq!(reloaded.transactions.count().unwrap(), 3);
    }

    #[test]
    fn test_rules_are_per_user() {
        let (_temp, storage, session) = create_test_storage();
        let service = RecurringService::new(&storage);
        service.add(&session, rent_input(date(2024, 1, 1))).unwrap();

        let stranger = Session::new(UserId::new(), "Omar");
        assert!(service.process(&stranger, date(2024, 3, 15)).unwrap().is_empty());
        assert!(service.list(&stranger).unwrap().is_empty());
    }

    #[test]
    fn test_add_validates_and_remove() {
        let (_temp, storage, session) = create_test_storage();
        let service = RecurringService::new(&storage);

        let mut input = rent_input(date(2024, 1, 1));
        input.interval_days = 0;
        assert!(service.add(&session, input).unwrap_err().is_validation());

        let mut input = rent_input(date(2024, 1, 1));
        input.interval_days = u32::MAX;
        assert!(service.add(&session, input).unwrap_err().is_validation());
        assert!(service.list(&session).unwrap().is_empty());

        let rule = service.add(&session, rent_input(date(2024, 1, 1))).unwrap();
        assert!(service.remove(&session, "rec-00000000").unwrap_err().is_not_found());
        assert_eq!(service.remove(&session, &rule.id.short()).unwrap().id, rule.id);
        assert!(service.list(&session).unwrap().is_empty());
    }
}
