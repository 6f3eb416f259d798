//! Spending Trends
//!
//! Month-over-month change in expenses.

use crate::models::money::round2;
use crate::models::{Money, Transaction};

use super::monthly::MonthlyReport;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendEntry {
    pub from: String,
    pub to: String,
    pub change: Money,
    /// Two decimal places; 0 when the earlier month had no expenses
    pub percent_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingTrends {
    pub entries: Vec<TrendEntry>,
}

impl SpendingTrends {
    /// One entry per consecutive pair of months with data
    pub fn generate(transactions: &[Transaction]) -> Self {
        let monthly = MonthlyReport::generate(transactions);
        let months: Vec<(&String, Money)> = monthly
            .months
            .iter()
            .map(|(month, totals)| (month, totals.expense))
            .collect();

        let entries = months
            .windows(2)
            .map(|pair| {
                let (from, previous) = pair[0];
                let (to, current) = pair[1];
                let change = current - previous;
                let percent_change = if previous.is_positive() {
                    round2(change.as_f64() / previous.as_f64() * 100.0)
                } else {
                    0.0
                };
                TrendEntry {
                    from: from.clone(),
                    to: to.clone(),
                    change,
                    percent_change,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        if self.entries.is_empty() {
            return "Not enough data: trends need at least two months of transactions.\n"
                .to_string();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<18} {:>14} {:>10}\n",
            "Period", "Change", "%"
        ));
        output.push_str(&"-".repeat(44));
        output.push('\n');

        for entry in &self.entries {
            output.push_str(&format!(
                "{:<18} {:>14} {:>9.2}%\n",
                format!("{} -> {}", entry.from, entry.to),
                entry.change.format_with_symbol(symbol),
                entry.percent_change
            ));
        }

        output
    }
}
