//! Dashboard Summary
//!
//! Totals for the calendar month containing a reference date, the lifetime
//! balance, and the month's biggest expense categories.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::money::round1;
use crate::models::{Money, Transaction};

const TOP_CATEGORY_COUNT: usize = 3;

/// One of the month's largest expense categories
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Money,
    /// Share of the month's total expenses, one decimal place
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// e.g. "March 2025"
    pub period: String,
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_savings: Money,
    /// Lifetime income minus lifetime expense
    pub current_balance: Money,
    pub top_categories: Vec<CategoryShare>,
}

impl DashboardSummary {
    /// Build the summary from one user's transactions
    pub fn generate(transactions: &[Transaction], today: NaiveDate) -> Self {
        let in_month = |t: &&Transaction| {
            t.date.year() == today.year() && t.date.month() == today.month()
        };

        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();
        // Categories in first-seen order
        let mut ranked: Vec<(&str, Money)> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();

        for txn in transactions.iter().filter(in_month) {
            if txn.is_income() {
                total_income += txn.amount;
            } else {
                total_expenses += txn.amount;
                let index = *slot.entry(txn.category.as_str()).or_insert_with(|| {
                    ranked.push((txn.category.as_str(), Money::zero()));
                    ranked.len() - 1
                });
                ranked[index].1 += txn.amount;
            }
        }

        let current_balance = transactions.iter().map(Transaction::signed_amount).sum();

        // Stable, so tied categories keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let top_categories = ranked
            .into_iter()
            .take(TOP_CATEGORY_COUNT)
            .map(|(category, amount)| CategoryShare {
                category: category.to_string(),
                amount,
                percent: if total_expenses.is_positive() {
                    round1(amount.as_f64() / total_expenses.as_f64() * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            period: today.format("%B %Y").to_string(),
            total_income,
            total_expenses,
            net_savings: total_income - total_expenses,
            current_balance,
            top_categories,
        }
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Dashboard: {}\n", self.period));
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Income:",
            self.total_income.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Expenses:",
            self.total_expenses.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Net savings:",
            self.net_savings.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Current balance:",
            self.current_balance.format_with_symbol(symbol)
        ));

        output.push_str("\nTop spending categories:\n");
        if self.top_categories.is_empty() {
            output.push_str("  (no expenses this month)\n");
        }
        for (rank, share) in self.top_categories.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<20} {:>12} {:>6.1}%\n",
                rank + 1,
                share.category,
                share.amount.format_with_symbol(symbol),
                share.percent
            ));
        }

        output
    }
}
