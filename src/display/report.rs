//! Report formatting utilities for terminal output
//!
//! Budget alerts, goal progress and the health score, plus the small string
//! helpers the other views share.

use std::collections::BTreeMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Money;
use crate::services::{BudgetAlert, GoalProgress};

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Format limits or targets keyed by name
pub fn format_amount_list(title: &str, amounts: &BTreeMap<String, Money>, symbol: &str) -> String {
    if amounts.is_empty() {
        return format!("No {} set.\n", title.to_lowercase());
    }

    let mut output = format!("{}\n{}\n", title, separator(36));
    for (name, amount) in amounts {
        output.push_str(&format!(
            "{:<22} {:>13}\n",
            truncate(name, 22),
            amount.format_with_symbol(symbol)
        ));
    }
    output
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Over by")]
    over_by: String,
}

/// Format budget alerts, or a reassuring line when there are none
pub fn format_budget_alerts(alerts: &[BudgetAlert], symbol: &str) -> String {
    if alerts.is_empty() {
        return "All categories are within budget.\n".to_string();
    }

    let rows: Vec<AlertRow> = alerts
        .iter()
        .map(|alert| AlertRow {
            category: alert.category.clone(),
            spent: alert.spent.format_with_symbol(symbol),
            limit: alert.limit.format_with_symbol(symbol),
            over_by: alert.over_by.format_with_symbol(symbol),
        })
        .collect();

    let mut output = format!("Over budget in {} categor(ies):\n", alerts.len());
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    bar: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format progress toward each savings goal
pub fn format_goal_progress(progress: &[GoalProgress], symbol: &str) -> String {
    if progress.is_empty() {
        return "No goals set.\n".to_string();
    }

    let rows: Vec<GoalRow> = progress
        .iter()
        .map(|goal| GoalRow {
            name: goal.goal_name.clone(),
            target: goal.target.format_with_symbol(symbol),
            remaining: goal.remaining.format_with_symbol(symbol),
            bar: format_bar(goal.percent, 100.0, 20),
            percent: format!("{:.2}", goal.percent),
            status: goal.status.to_string(),
        })
        .collect();

    // Every goal shares the same savings figure
    let mut output = format!(
        "Net savings: {}\n",
        progress[0].current_savings.format_with_symbol(symbol)
    );
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output
}

/// Format the financial health score with a short verdict
pub fn format_health_score(score: f64) -> String {
    let verdict = if score >= 70.0 {
        "Excellent"
    } else if score >= 40.0 {
        "Fair"
    } else {
        "Needs attention"
    };

    format!(
        "Financial Health Score\n{}\n{:.2} / 100  [{}]  {}\n",
        separator(36),
        score,
        format_bar(score, 100.0, 20),
        verdict
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::GoalStatus;

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50.0, 100.0, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(-20.0, 100.0, 4), "░░░░");
        assert_eq!(format_bar(150.0, 100.0, 4), "████");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Test", 4), "Test");
        assert_eq!(truncate("Café au lait", 6), "Caf...");
    }

    #[test]
    fn test_budget_alerts() {
        assert_eq!(
            format_budget_alerts(&[], "$"),
            "All categories are within budget.\n"
        );

        let alert = BudgetAlert {
            category: "Food".into(),
            spent: Money::from_units(620),
            limit: Money::from_units(500),
            over_by: Money::from_units(120),
        };
        let text = format_budget_alerts(&[alert], "$");
        assert!(text.contains("Food"));
        assert!(text.contains("$120.00"));
    }

    #[test]
    fn test_goal_progress() {
        let goal = GoalProgress {
            goal_name: "Car".into(),
            target: Money::from_units(10000),
            current_savings: Money::from_units(8000),
            remaining: Money::from_units(2000),
            percent: 80.0,
            status: GoalStatus::InProgress,
        };
        let text = format_goal_progress(&[goal], "$");
        assert!(text.starts_with("Net savings: $8000.00"));
        assert!(text.contains("80.00"));
        assert!(text.contains("In Progress"));
    }

    #[test]
    fn test_amount_list() {
        let mut budgets = BTreeMap::new();
        assert_eq!(format_amount_list("Budgets", &budgets, "$"), "No budgets set.\n");

        budgets.insert("Food".to_string(), Money::from_units(500));
        let text = format_amount_list("Budgets", &budgets, "$");
        assert!(text.contains("Food"));
        assert!(text.contains("$500.00"));
    }

    #[test]
    fn test_health_score() {
        let text = format_health_score(58.0);
        assert!(text.contains("58.00 / 100"));
        assert!(text.contains("Fair"));
    }
}
