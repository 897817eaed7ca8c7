//! Time bucketing helpers for trend and heatmap projections
//!
//! All timestamps are interpreted as UTC, matching what the store writes.
//! Mixing conventions between write time and read time would silently
//! shift the heatmap, so the convention lives in one place.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use sentilog_store::TIMESTAMP_FORMAT;

/// Day-of-week axis labels, index 0 = Sunday.
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Parse a stored timestamp. Accepts the canonical storage format and
/// RFC 3339 as a fallback for rows written by other tooling. Returns
/// `None` for anything else; the caller decides which projections the
/// record drops out of.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc())
}

/// Hour-resolution bucket key, `YYYY-MM-DD HH`. Zero-padded fields make
/// lexicographic order chronological, which the trend projection relies on.
pub fn hour_bucket_key(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H").to_string()
}

/// (day-of-week, hour-of-day) heatmap coordinate; day 0 = Sunday,
/// hour 0-23.
pub fn day_hour_coordinate(ts: &NaiveDateTime) -> (usize, usize) {
    let day = ts.weekday().num_days_from_sunday() as usize;
    let hour = ts.hour() as usize;
    (day, hour)
}
