//! Date helpers
//!
//! All dates are plain calendar dates in ISO 8601 form (`YYYY-MM-DD`).

use chrono::{Local, NaiveDate};

use crate::error::{TallyError, TallyResult};

/// The one date format accepted and produced everywhere
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for month keys in reports
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Today's local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string
///
/// `field` names the input in the error message (e.g. "start date").
pub fn parse_date(input: &str, field: &str) -> TallyResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        TallyError::Validation(format!(
            "Invalid {}: '{}'. Use YYYY-MM-DD",
            field,
            input.trim()
        ))
    })
}

/// Parse an optional date, treating blank input as absent
pub fn parse_optional_date(input: Option<&str>, field: &str) -> TallyResult<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s, field).map(Some),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The `YYYY-MM` key of the month containing `date`
pub fn month_key(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// Number of days from `start` to `end` (negative if `end` is earlier)
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Check that `start <= end`
pub fn ensure_ordered(start: NaiveDate, end: NaiveDate) -> TallyResult<()> {
    if start > end {
        return Err(TallyError::OutOfRange(format!(
            "end date {} is earlier than start date {}",
            format_date(end),
            format_date(start)
        )));
    }
    Ok(())
}
