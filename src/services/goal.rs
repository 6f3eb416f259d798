//! Savings goals and progress tracking
//!
//! Progress is measured against net savings: lifetime income minus lifetime
//! expense. Every goal is measured against the same figure.

use std::collections::BTreeMap;
use std::fmt;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::money::round2;
use crate::models::{Money, Session, Transaction, UserId};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    InProgress,
    Completed,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal_name: String,
    pub target: Money,
    pub current_savings: Money,
    /// Never below zero
    pub remaining: Money,
    /// Capped at 100; negative when net savings are negative
    pub percent: f64,
    pub status: GoalStatus,
}

/// Lifetime income minus lifetime expense
pub fn net_savings(user_id: UserId, transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|t| t.user_id == user_id)
        .map(Transaction::signed_amount)
        .sum()
}

/// Progress toward each goal, in goal-name order
pub fn goal_progress(
    user_id: UserId,
    transactions: &[Transaction],
    goals: &BTreeMap<String, Money>,
) -> Vec<GoalProgress> {
    let savings = net_savings(user_id, transactions);

    goals
        .iter()
        .map(|(name, &target)| {
            let percent = round2(savings.as_f64() / target.as_f64() * 100.0).min(100.0);
            let remaining = target - savings;
            GoalProgress {
                goal_name: name.clone(),
                target,
                current_savings: savings,
                remaining: if remaining.is_negative() {
                    Money::zero()
                } else {
                    remaining
                },
                percent,
                status: if percent >= 100.0 {
                    GoalStatus::Completed
                } else {
                    GoalStatus::InProgress
                },
            }
        })
        .collect()
}

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set or overwrite a goal target, returning the previous one
    pub fn set(&self, session: &Session, name: &str, target: Money) -> TallyResult<Option<Money>> {
        let mut table = self.storage.goals.snapshot()?;
        let previous = table
            .set(session.user_id, name, target)
            .map_err(|e| TallyError::Validation(e.to_string()))?;
        self.storage.goals.commit(table)?;

        let label = Some(name.trim().to_string());
        match previous {
            Some(old) => self.storage.log_update(
                EntityType::Goal,
                session.user_id.to_string(),
                label,
                &serde_json::json!({ "target": old }),
                &serde_json::json!({ "target": target }),
            )?,
            None => self.storage.log_create(
                EntityType::Goal,
                session.user_id.to_string(),
                label,
                &serde_json::json!({ "target": target }),
            )?,
        }

        Ok(previous)
    }

    pub fn remove(&self, session: &Session, name: &str) -> TallyResult<Money> {
        let mut table = self.storage.goals.snapshot()?;
        let removed = table
            .remove(session.user_id, name)
            .ok_or_else(|| TallyError::goal_not_found(name.trim()))?;
        self.storage.goals.commit(table)?;

        self.storage.log_delete(
            EntityType::Goal,
            session.user_id.to_string(),
            Some(name.trim().to_string()),
            &serde_json::json!({ "target": removed }),
        )?;

        Ok(removed)
    }

    pub fn list(&self, session: &Session) -> TallyResult<BTreeMap<String, Money>> {
        Ok(self.storage.goals.snapshot()?.for_user(session.user_id))
    }

    pub fn progress(&self, session: &Session) -> TallyResult<Vec<GoalProgress>> {
        let goals = self.list(session)?;
        let transactions = self.storage.transactions.get_for_user(session.user_id)?;
        Ok(goal_progress(session.user_id, &transactions, &goals))
    }
}
