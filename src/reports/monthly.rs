//! Monthly Report
//!
//! Income and expense totals per `YYYY-MM` month. Months without
//! transactions are absent rather than zero.

use std::collections::BTreeMap;

use crate::dates::month_key;
use crate::models::{Money, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthTotals {
    pub income: Money,
    pub expense: Money,
}

impl MonthTotals {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Month totals keyed by `YYYY-MM`, iterated chronologically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyReport {
    pub months: BTreeMap<String, MonthTotals>,
}

impl MonthlyReport {
    pub fn generate(transactions: &[Transaction]) -> Self {
        let mut months: BTreeMap<String, MonthTotals> = BTreeMap::new();

        for txn in transactions {
            let totals = months.entry(month_key(txn.date)).or_default();
            if txn.is_income() {
                totals.income += txn.amount;
            } else {
                totals.expense += txn.amount;
            }
        }

        Self { months }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14}\n",
            "Month", "Income", "Expense", "Net"
        ));
        output.push_str(&"-".repeat(55));
        output.push('\n');

        for (month, totals) in &self.months {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14}\n",
                month,
                totals.income.format_with_symbol(symbol),
                totals.expense.format_with_symbol(symbol),
                totals.net().format_with_symbol(symbol)
            ));
        }

        output
    }
}
