//! Day-granularity date handling.
//!
//! Event dates are stored without a time of day. Clients may still send full
//! timestamps (the date picker in the frontend sends ISO strings), so every
//! incoming date goes through [`strip_time`] before it is compared or stored.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{DatepollError, DatepollResult};

/// Wire format for stored dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Reduce a date or timestamp string to its calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM[:SS]`
/// timestamps. RFC 3339 input keeps the date as written in its own offset.
pub fn strip_time(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

/// Like [`strip_time`], but reports the offending input.
pub fn parse_date(input: &str) -> DatepollResult<NaiveDate> {
    strip_time(input).ok_or_else(|| DatepollError::InvalidDate(input.to_string()))
}

/// Normalize a list of dates, keeping the first occurrence of each day.
pub fn normalize_dates<S: AsRef<str>>(inputs: &[S]) -> DatepollResult<Vec<NaiveDate>> {
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(inputs.len());

    for input in inputs {
        let date = parse_date(input.as_ref())?;
        if !dates.contains(&date) {
            dates.push(date);
        }
    }

    Ok(dates)
}
