//! Transaction search and filtering
//!
//! A [`SearchRequest`] holds raw user input. [`SearchRequest::validate`] turns
//! it into a typed [`TransactionQuery`] without touching storage; the query is
//! then applied to an in-memory slice of transactions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::dates::{ensure_ordered, parse_optional_date};
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Transaction, TransactionKind, UserId};

/// Field to sort search results by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
    Category,
}

impl FromStr for SortKey {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            other => Err(TallyError::Validation(format!(
                "Invalid sort key '{}'. Use date, amount or category",
                other
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Amount => write!(f, "amount"),
            Self::Category => write!(f, "category"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Unvalidated search input, as typed at a prompt or passed as flags
///
/// Blank strings count as "not supplied".
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub user_id: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub sort_by: Option<String>,
    pub descending: bool,
}

impl SearchRequest {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Check every field and build the typed query
    pub fn validate(&self) -> TallyResult<TransactionQuery> {
        if self.user_id.trim().is_empty() {
            return Err(TallyError::Validation("User id must not be empty".into()));
        }
        let user_id: UserId = self
            .user_id
            .parse()
            .map_err(|e| TallyError::Validation(format!("User id: {}", e)))?;

        let start = parse_optional_date(self.start_date.as_deref(), "start date")?;
        let end = parse_optional_date(self.end_date.as_deref(), "end date")?;
        if let (Some(start), Some(end)) = (start, end) {
            ensure_ordered(start, end)?;
        }

        // An inverted amount range is allowed; it simply matches nothing.
        let min_amount = parse_bound(self.min_amount.as_deref(), "minimum amount", f64::ceil)?;
        let max_amount = parse_bound(self.max_amount.as_deref(), "maximum amount", f64::floor)?;

        let kind = match non_blank(self.kind.as_deref()) {
            Some(raw) => Some(
                raw.parse::<TransactionKind>()
                    .map_err(|e| TallyError::Validation(e.to_string()))?,
            ),
            None => None,
        };

        let sort = match non_blank(self.sort_by.as_deref()) {
            Some(raw) => Some(raw.parse::<SortKey>()?),
            None => None,
        };

        Ok(TransactionQuery {
            user_id,
            start,
            end,
            category: non_blank(self.category.as_deref()).map(str::to_string),
            kind,
            min_amount,
            max_amount,
            sort,
            order: if self.descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            },
        })
    }
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an amount bound
///
/// Any finite number is accepted. Values finer than a cent are rounded
/// with `round` (up for a minimum, down for a maximum) so the bound keeps
/// its meaning against whole-cent amounts.
fn parse_bound(
    input: Option<&str>,
    field: &str,
    round: fn(f64) -> f64,
) -> TallyResult<Option<Money>> {
    let Some(raw) = non_blank(input) else {
        return Ok(None);
    };
    if let Ok(exact) = Money::parse(raw) {
        return Ok(Some(exact));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| Some(Money::from_cents(round(value * 100.0) as i64)))
        .ok_or_else(|| {
            TallyError::Validation(format!("Invalid {}: '{}' is not a number", field, raw))
        })
}

/// A validated set of filters plus an optional sort
///
/// Every supplied filter must hold (logical AND). All bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub user_id: UserId,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Case-insensitive exact match
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub sort: Option<SortKey>,
    pub order: SortOrder,
}

impl TransactionQuery {
    /// A query with no filters: the user's transactions in insertion order
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            start: None,
            end: None,
            category: None,
            kind: None,
            min_amount: None,
            max_amount: None,
            sort: None,
            order: SortOrder::Ascending,
        }
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn amount_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn sort_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(key);
        self.order = order;
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        txn.user_id == self.user_id
            && self.start.map_or(true, |start| txn.date >= start)
            && self.end.map_or(true, |end| txn.date <= end)
            && self
                .category
                .as_deref()
                .map_or(true, |c| txn.category.to_lowercase() == c.trim().to_lowercase())
            && self.kind.map_or(true, |k| txn.kind == k)
            && self.min_amount.map_or(true, |min| txn.amount >= min)
            && self.max_amount.map_or(true, |max| txn.amount <= max)
    }

    /// Filter then sort, leaving the input untouched
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut results: Vec<Transaction> = transactions
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect();

        if let Some(key) = self.sort {
            // sort_by is stable; reversing the comparator keeps ties in
            // insertion order for both directions
            results.sort_by(|a, b| {
                let ordering = compare_by(key, a, b);
                match self.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        results
    }
}

fn compare_by(key: SortKey, a: &Transaction, b: &Transaction) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(
        user: UserId,
        kind: TransactionKind,
        cents: i64,
        category: &str,
        day: u32,
    ) -> Transaction {
        Transaction::new(user, kind, Money::from_cents(cents), category, date(2025, 3, day))
    }

    /// Mixed data for two users; amounts are distinct
    fn fixture() -> (UserId, Vec<Transaction>) {
        use TransactionKind::*;
        let me = UserId::new();
        let other = UserId::new();
        let all = vec![
            txn(me, Expense, 4500, "Food", 10),
            txn(other, Expense, 9900, "Food", 11),
            txn(me, Income, 300000, "Salary", 1),
            txn(me, Expense, 12000, "rent", 3),
            txn(me, Expense, 800, "FOOD", 20),
            txn(me, Expense, 2300, "Transport", 15),
            txn(other, Income, 100, "Gift", 2),
        ];
        (me, all)
    }

    fn request(user: UserId) -> SearchRequest {
        SearchRequest::for_user(user.to_string())
    }

    #[test]
    fn test_no_filters_returns_user_subset_in_order() {
        let (me, all) = fixture();
        let query = request(me).validate().unwrap();
        let results = query.apply(&all);

        let expected: Vec<_> = all.iter().filter(|t| t.user_id == me).cloned().collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_category_is_case_insensitive_exact() {
        let (me, all) = fixture();
        let mut req = request(me);
        req.category = Some("food".into());
        let results = req.validate().unwrap().apply(&all);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|t| t.category.eq_ignore_ascii_case("food")));

        req.category = Some("Foo".into());
        assert!(req.validate().unwrap().apply(&all).is_empty());
    }

    #[test]
    fn test_combined_filters_are_intersection() {
        let (me, all) = fixture();
        let base = TransactionQuery::for_user(me);
        let singles = [
            base.clone().date_range(Some(date(2025, 3, 5)), Some(date(2025, 3, 31))),
            base.clone().kind(TransactionKind::Expense),
            base.clone()
                .amount_range(Some(Money::from_cents(1000)), Some(Money::from_cents(50000))),
        ];
        let combined = base
            .date_range(Some(date(2025, 3, 5)), Some(date(2025, 3, 31)))
            .kind(TransactionKind::Expense)
            .amount_range(Some(Money::from_cents(1000)), Some(Money::from_cents(50000)));

        let expected: Vec<_> = all
            .iter()
            .filter(|t| singles.iter().all(|q| q.apply(&all).contains(t)))
            .cloned()
            .collect();

        let results = combined.apply(&all);
        assert_eq!(results, expected);
        // Food 45.00 on the 10th and Transport 23.00 on the 15th
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let (me, all) = fixture();
        let query = TransactionQuery::for_user(me)
            .date_range(Some(date(2025, 3, 3)), Some(date(2025, 3, 10)));
        let days: Vec<_> = query.apply(&all).iter().map(|t| t.date).collect();
        assert_eq!(days, vec![date(2025, 3, 10), date(2025, 3, 3)]);
    }

    #[test]
    fn test_amount_sort_directions_are_reverses() {
        let (me, all) = fixture();
        let asc = TransactionQuery::for_user(me)
            .sort_by(SortKey::Amount, SortOrder::Ascending)
            .apply(&all);
        let mut desc = TransactionQuery::for_user(me)
            .sort_by(SortKey::Amount, SortOrder::Descending)
            .apply(&all);

        assert_eq!(asc.first().unwrap().amount.cents(), 800);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let (me, all) = fixture();
        // "Food" and "FOOD" compare equal; insertion order must survive
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let results = TransactionQuery::for_user(me)
                .category("food")
                .sort_by(SortKey::Category, order)
                .apply(&all);
            assert_eq!(results[0].amount.cents(), 4500);
            assert_eq!(results[1].amount.cents(), 800);
        }
    }

    #[test]
    fn test_category_sort_ignores_case() {
        let (me, all) = fixture();
        let categories: Vec<_> = TransactionQuery::for_user(me)
            .sort_by(SortKey::Category, SortOrder::Ascending)
            .apply(&all)
            .into_iter()
            .map(|t| t.category)
            .collect();
        assert_eq!(categories, vec!["Food", "FOOD", "rent", "Salary", "Transport"]);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let (me, all) = fixture();
        let before = all.clone();
        let _ = TransactionQuery::for_user(me)
            .sort_by(SortKey::Date, SortOrder::Descending)
            .apply(&all);
        assert_eq!(all, before);
    }

    #[test]
    fn test_validation_failures() {
        let (me, _) = fixture();

        let mut req = SearchRequest::default();
        assert!(req.validate().unwrap_err().is_validation());

        req = request(me);
        req.start_date = Some("2025-13-01".into());
        assert!(matches!(req.validate(), Err(TallyError::Validation(_))));

        req = request(me);
        req.start_date = Some("2025-03-10".into());
        req.end_date = Some("2025-03-01".into());
        assert!(matches!(req.validate(), Err(TallyError::OutOfRange(_))));

        req = request(me);
        req.min_amount = Some("ten".into());
        assert!(matches!(req.validate(), Err(TallyError::Validation(_))));

        req = request(me);
        req.kind = Some("transfer".into());
        assert!(matches!(req.validate(), Err(TallyError::Validation(_))));

        req = request(me);
        req.sort_by = Some("payee".into());
        assert!(matches!(req.validate(), Err(TallyError::Validation(_))));
    }

    #[test]
    fn test_inverted_amount_range_matches_nothing() {
        let all = vec![txn(UserId::new(), TransactionKind::Expense, 7500, "Food", 4)];
        let me = all[0].user_id;

        let mut req = request(me);
        req.min_amount = Some("100".into());
        assert!(req.validate().unwrap().apply(&all).is_empty());

        req = request(me);
        req.max_amount = Some("50".into());
        assert!(req.validate().unwrap().apply(&all).is_empty());

        req.min_amount = Some("100".into());
        let query = req.validate().unwrap();
        assert_eq!(query.apply(&all), Vec::<Transaction>::new());
    }

    #[test]
    fn test_sub_cent_bounds_round_inward() {
        let me = UserId::new();
        let all = vec![
            txn(me, TransactionKind::Expense, 1050, "Food", 4),
            txn(me, TransactionKind::Expense, 1051, "Food", 5),
        ];

        let mut req = request(me);
        req.min_amount = Some("10.505".into());
        let above = req.validate().unwrap().apply(&all);
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].amount, Money::from_cents(1051));

        req = request(me);
        req.max_amount = Some("10.505".into());
        let below = req.validate().unwrap().apply(&all);
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].amount, Money::from_cents(1050));

        req = request(me);
        req.min_amount = Some("NaN".into());
        assert!(matches!(req.validate(), Err(TallyError::Validation(_))));
    }

    #[test]
    fn test_blank_fields_are_ignored() {
        let (me, _) = fixture();
        let mut req = request(me);
        req.start_date = Some("  ".into());
        req.kind = Some(String::new());
        req.sort_by = Some(" ".into());

        let query = req.validate().unwrap();
        assert_eq!(query, TransactionQuery::for_user(me));
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        let (me, all) = fixture();
        let mut req = request(me);
        req.kind = Some("INCOME".into());
        let results = req.validate().unwrap().apply(&all);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, "Salary");
    }
}
