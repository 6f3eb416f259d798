//! Financial health score
//!
//! A weighted blend: 60 points from the savings ratio and 40 points from
//! average goal completion. The savings ratio can be negative, so the score
//! can be too.

use std::collections::BTreeMap;

use crate::error::TallyResult;
use crate::models::money::round2;
use crate::models::{Money, Session, Transaction, UserId};
use crate::storage::Storage;

use super::goal::goal_progress;

const SAVINGS_WEIGHT: f64 = 60.0;
const GOAL_WEIGHT: f64 = 40.0;

/// (income - expense) / income, or 0 when there is no income
pub fn savings_ratio(user_id: UserId, transactions: &[Transaction]) -> f64 {
    let (income, expense) = transactions
        .iter()
        .filter(|t| t.user_id == user_id)
        .fold((Money::zero(), Money::zero()), |(inc, exp), t| {
            if t.is_income() {
                (inc + t.amount, exp)
            } else {
                (inc, exp + t.amount)
            }
        });

    if income.is_positive() {
        (income - expense).as_f64() / income.as_f64()
    } else {
        0.0
    }
}

pub fn financial_health_score(
    user_id: UserId,
    transactions: &[Transaction],
    goals: &BTreeMap<String, Money>,
) -> f64 {
    let progress = goal_progress(user_id, transactions, goals);
    let goal_completion = if progress.is_empty() {
        0.0
    } else {
        progress.iter().map(|p| p.percent).sum::<f64>() / progress.len() as f64 / 100.0
    };

    round2(savings_ratio(user_id, transactions) * SAVINGS_WEIGHT + goal_completion * GOAL_WEIGHT)
}

pub struct HealthService<'a> {
    storage: &'a Storage,
}

impl<'a> HealthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn score(&self, session: &Session) -> TallyResult<f64> {
        let goals = self.storage.goals.snapshot()?.for_user(session.user_id);
        let transactions = self.storage.transactions.get_for_user(session.user_id)?;
        Ok(financial_health_score(session.user_id, &transactions, &goals))
    }
}
