//! Time and day-bucketing utilities
//!
//! Every day bucket is a UTC calendar date. Ingest and aggregation both go
//! through these helpers so the two sides can never disagree on the clock.

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Format used for day keys in the log and the report
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// UTC calendar day of an instant
pub fn day_of(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Current UTC calendar day
pub fn today() -> NaiveDate {
    day_of(Utc::now())
}

/// The day `n` days before `day`, saturating at the earliest representable date
pub fn days_before(day: NaiveDate, n: u32) -> NaiveDate {
    day.checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}

/// Render a day key as `YYYY-MM-DD`
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
