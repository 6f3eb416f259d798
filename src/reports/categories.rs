//! Category Breakdown
//!
//! Totals per category for one transaction kind.

use std::collections::HashMap;

use crate::models::{Money, Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub kind: TransactionKind,
    /// Unordered; use [`CategoryBreakdown::sorted`] for display
    pub totals: HashMap<String, Money>,
}

impl CategoryBreakdown {
    pub fn generate(transactions: &[Transaction], kind: TransactionKind) -> Self {
        let mut totals: HashMap<String, Money> = HashMap::new();
        for txn in transactions.iter().filter(|t| t.kind == kind) {
            *totals.entry(txn.category.clone()).or_default() += txn.amount;
        }
        Self { kind, totals }
    }

    /// Largest amount first, ties by category name
    pub fn sorted(&self) -> Vec<(&str, Money)> {
        let mut rows: Vec<(&str, Money)> = self
            .totals
            .iter()
            .map(|(category, amount)| (category.as_str(), *amount))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    pub fn total(&self) -> Money {
        self.totals.values().copied().sum()
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("Category breakdown ({})\n", self.kind));
        output.push_str(&"-".repeat(40));
        output.push('\n');

        for (category, amount) in self.sorted() {
            output.push_str(&format!(
                "{:<24} {:>15}\n",
                category,
                amount.format_with_symbol(symbol)
            ));
        }

        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>15}\n",
            "Total",
            self.total().format_with_symbol(symbol)
        ));
        output
    }
}
