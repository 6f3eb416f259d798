//! Transaction model
//!
//! A single dated income or expense entry owned by a user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Whether a transaction brings money in or takes it out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// The amount's contribution to a running balance
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionValidationError;

    /// Case-insensitive; only "income" and "expense" are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(TransactionValidationError::UnknownKind(s.trim().to_string())),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// The user who owns this transaction
    pub user_id: UserId,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Always positive; direction comes from `kind`
    pub amount: Money,

    pub category: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub payment_method: String,
}

impl Transaction {
    /// Create a transaction with a fresh id
    ///
    /// The category is trimmed; call [`Transaction::validate`] before storing.
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            kind,
            amount,
            category: category.into().trim().to_string(),
            date,
            description: String::new(),
            payment_method: String::new(),
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

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Signed contribution to the owner's balance
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions and recurring rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    EmptyCategory,
    UnknownKind(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::EmptyCategory => write!(f, "Category must not be empty"),
            Self::UnknownKind(kind) => {
                write!(f, "Type must be 'income' or 'expense' (got '{}')", kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            UserId::new(),
            TransactionKind::Expense,
            Money::from_cents(4599),
            "  Groceries ",
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        )
        .with_description("Weekly shop")
        .with_payment_method("card")
    }

    #[test]
    fn test_new_trims_category() {
        let txn = sample();
        assert_eq!(txn.category, "Groceries");
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!(" EXPENSE".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!(matches!(
            "transfer".parse::<TransactionKind>(),
            Err(TransactionValidationError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_signed_amount() {
        let mut txn = sample();
        assert_eq!(txn.signed_amount().cents(), -4599);
        txn.kind = TransactionKind::Income;
        assert_eq!(txn.signed_amount().cents(), 4599);
    }

    #[test]
    fn test_validation() {
        let mut txn = sample();
        txn.amount = Money::zero();
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));

        let mut txn = sample();
        txn.category = "   ".into();
        assert_eq!(txn.validate(), Err(TransactionValidationError::EmptyCategory));
    }

    #[test]
    fn test_serialized_shape() {
        let txn = sample();
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["amount"], 4599);
        assert_eq!(value["date"], "2025-01-15");

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "2025-01-15 expense Groceries 45.99");
    }
}
