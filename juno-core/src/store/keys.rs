//! Logical key space
//!
//! | Key pattern | Value |
//! |---|---|
//! | `entries_{date}` | daily slot map |
//! | `entries_timeline_{date}` | timeline entry list |
//! | `media` | media item list |
//! | `ideas` | idea list |
//! | `captures` | smart capture list |
//! | `profile` | user profile |
//!
//! Dates are `YYYY-MM-DD`, so lexicographic key order is chronological.
//! Timeline keys share the `entries_` prefix with slot keys; use
//! [`parse_slots_key`] rather than a bare prefix check when scanning.

use chrono::NaiveDate;

pub const SLOTS_PREFIX: &str = "entries_";
pub const TIMELINE_PREFIX: &str = "entries_timeline_";
pub const MEDIA: &str = "media";
pub const IDEAS: &str = "ideas";
pub const CAPTURES: &str = "captures";
pub const PROFILE: &str = "profile";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zero-padded `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn slots_key(date: NaiveDate) -> String {
    format!("{}{}", SLOTS_PREFIX, format_date(date))
}

pub fn timeline_key(date: NaiveDate) -> String {
    format!("{}{}", TIMELINE_PREFIX, format_date(date))
}

/// The date of a daily-slot key, or `None` for any other key.
pub fn parse_slots_key(key: &str) -> Option<NaiveDate> {
    key.strip_prefix(SLOTS_PREFIX).and_then(parse_date)
}

/// The date of a timeline key, or `None` for any other key.
pub fn parse_timeline_key(key: &str) -> Option<NaiveDate> {
    key.strip_prefix(TIMELINE_PREFIX).and_then(parse_date)
}
