//! Recurring transaction rules
//!
//! A rule is a template that produces a transaction every `interval_days`
//! days, starting at `next_date`.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{RecurringRuleId, UserId};
use super::money::Money;
use super::transaction::{Transaction, TransactionKind, TransactionValidationError};

/// Prefix added to descriptions of materialized transactions
pub const RECURRING_PREFIX: &str = "Recurring: ";

/// Longest accepted interval between instances (ten years)
pub const MAX_INTERVAL_DAYS: u32 = 3660;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: RecurringRuleId,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub amount: Money,

    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub payment_method: String,

    /// Date of the next instance to materialize
    pub next_date: NaiveDate,

    pub interval_days: u32,
}

impl RecurringRule {
    pub fn new(
        kind: TransactionKind,
        amount: Money,
        category: impl Into<String>,
        next_date: NaiveDate,
        interval_days: u32,
    ) -> Self {
        Self {
            id: RecurringRuleId::new(),
            kind,
            amount,
            category: category.into().trim().to_string(),
            description: String::new(),
            payment_method: String::new(),
            next_date,
            interval_days,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    /// Whether an instance is due on or before `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_date <= today
    }

    /// Build the transaction for the current `next_date` without advancing
    pub fn instance_for(&self, user_id: UserId) -> Transaction {
        Transaction::new(user_id, self.kind, self.amount, &self.category, self.next_date)
            .with_description(format!("{}{}", RECURRING_PREFIX, self.description))
            .with_payment_method(&self.payment_method)
    }

    /// Move `next_date` forward by one interval
    ///
    /// Fails without moving when the result would fall past the last
    /// representable date.
    pub fn advance(&mut self) -> Result<(), RecurringRuleError> {
        self.next_date = self
            .next_date
            .checked_add_days(Days::new(u64::from(self.interval_days)))
            .ok_or(RecurringRuleError::DateOverflow(self.next_date))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RecurringRuleError> {
        if self.interval_days == 0 {
            return Err(RecurringRuleError::ZeroInterval);
        }
        if self.interval_days > MAX_INTERVAL_DAYS {
            return Err(RecurringRuleError::IntervalTooLong(self.interval_days));
        }
        if !self.amount.is_positive() {
            return Err(RecurringRuleError::Transaction(
                TransactionValidationError::NonPositiveAmount(self.amount),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(RecurringRuleError::Transaction(
                TransactionValidationError::EmptyCategory,
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RecurringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} every {} days, next {}",
            self.kind,
            self.category,
            self.amount,
            self.interval_days,
            self.next_date.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringRuleError {
    ZeroInterval,
    IntervalTooLong(u32),
    DateOverflow(NaiveDate),
    Transaction(TransactionValidationError),
}

impl fmt::Display for RecurringRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval => write!(f, "Interval must be at least one day"),
            Self::IntervalTooLong(days) => write!(
                f,
                "Interval of {} days is too long (at most {})",
                days, MAX_INTERVAL_DAYS
            ),
            Self::DateOverflow(from) => {
                write!(f, "Next date after {} is out of the calendar range", from)
            }
            Self::Transaction(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for RecurringRuleError {}
