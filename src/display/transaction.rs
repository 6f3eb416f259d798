//! Transaction display formatting
//!
//! Table and detail views for transactions and recurring rules.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{RecurringRule, Transaction};

use super::report::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Payment")]
    payment_method: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, symbol: &str) -> Self {
        Self {
            id: txn.id.short(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            category: truncate(&txn.category, 20),
            amount: txn.signed_amount().format_with_symbol(symbol),
            payment_method: truncate(&txn.payment_method, 12),
            description: truncate(&txn.description, 30),
        }
    }
}

/// Format transactions as a table, in the order given
pub fn format_transaction_table(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow::new(txn, symbol))
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output.push_str(&format!("{} transaction(s)\n", transactions.len()));
    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(symbol)));

    if !txn.payment_method.is_empty() {
        output.push_str(&format!("Payment:     {}\n", txn.payment_method));
    }
    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Every")]
    interval: String,
    #[tabled(rename = "Next")]
    next_date: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Format recurring rules as a table
pub fn format_rule_table(rules: &[RecurringRule], symbol: &str) -> String {
    if rules.is_empty() {
        return "No recurring rules.\n".to_string();
    }

    let rows: Vec<RuleRow> = rules
        .iter()
        .map(|rule| RuleRow {
            id: rule.id.short(),
            kind: rule.kind.to_string(),
            category: truncate(&rule.category, 20),
            amount: rule.amount.format_with_symbol(symbol),
            interval: format!("{} day(s)", rule.interval_days),
            next_date: rule.next_date.format("%Y-%m-%d").to_string(),
            description: truncate(&rule.description, 30),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}
