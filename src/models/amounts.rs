//! Per-user named amounts
//!
//! Budgets (category -> limit) and savings goals (goal name -> target) share
//! the same shape on disk: a map keyed by user id to a map of positive amounts.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::ids::UserId;
use super::money::Money;

/// Budget limits per category, per user
pub type BudgetTable = AmountTable;

/// Savings goal targets per goal name, per user
pub type GoalTable = AmountTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountTable(HashMap<UserId, BTreeMap<String, Money>>);

impl AmountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries for a user, sorted by name
    pub fn for_user(&self, user_id: UserId) -> BTreeMap<String, Money> {
        self.0.get(&user_id).cloned().unwrap_or_default()
    }

    pub fn get(&self, user_id: UserId, name: &str) -> Option<Money> {
        self.0.get(&user_id).and_then(|m| m.get(name.trim()).copied())
    }

    /// Insert or overwrite an entry, returning the previous amount
    pub fn set(
        &mut self,
        user_id: UserId,
        name: &str,
        amount: Money,
    ) -> Result<Option<Money>, AmountError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AmountError::EmptyName);
        }
        if !amount.is_positive() {
            return Err(AmountError::NonPositive(amount));
        }
        Ok(self
            .0
            .entry(user_id)
            .or_default()
            .insert(name.to_string(), amount))
    }

    /// Remove an entry, returning its amount if it existed
    pub fn remove(&mut self, user_id: UserId, name: &str) -> Option<Money> {
        let entries = self.0.get_mut(&user_id)?;
        let removed = entries.remove(name.trim());
        if entries.is_empty() {
            self.0.remove(&user_id);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    EmptyName,
    NonPositive(Money),
}

impl std::fmt::Display for AmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name must not be empty"),
            Self::NonPositive(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
        }
    }
}

impl std::error::Error for AmountError {}
