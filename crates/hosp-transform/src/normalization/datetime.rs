//! Best-effort date parsing and `DD/MM/YYYY` formatting.
//!
//! Dates arrive in whatever shape the source system produced. Anything that
//! resolves to a full calendar date is rewritten as `DD/MM/YYYY`; partial dates
//! (year, year-month) and garbage become `None` rather than an error.
//!
//! Slash-separated dates are read day-first, so a value that was already
//! normalized parses back to the same date. Month-first is only used when the
//! day-first reading is impossible (`12/25/2020`).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Output format for every normalized date field.
pub const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// Years outside this range are treated as misparses (two-digit years, ids).
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Parse a date/time string into a calendar date.
///
/// Returns `None` for empty, partial or unrecognized input.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    try_parse_datetime(trimmed)
        .map(|dt| dt.date())
        .or_else(|| try_parse_offset_datetime(trimmed))
        .or_else(|| try_parse_date(trimmed))
}

/// Normalize a date value to `DD/MM/YYYY`, or `None` when it cannot be parsed.
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(format_day_first)
}

/// Format a date as `DD/MM/YYYY`.
pub fn format_day_first(date: NaiveDate) -> String {
    date.format(DAY_FIRST_FORMAT).to_string()
}

/// Parse a value that is already normalized, and nothing else.
pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FIRST_FORMAT)
        .ok()
        .filter(is_plausible)
}

fn is_plausible(date: &NaiveDate) -> bool {
    PLAUSIBLE_YEARS.contains(&date.year())
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    formats
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .find(|dt| is_plausible(&dt.date()))
}

/// RFC 3339 timestamps with an offset (`2024-01-15T10:30:00Z`); the local date is kept.
fn try_parse_offset_datetime(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
        .filter(is_plausible)
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",  // 15/01/2024, also our own output
        "%m/%d/%Y",  // US: 01/15/2024
        "%d-%m-%Y",  // 15-01-2024
        "%d.%m.%Y",  // 15.01.2024
        "%Y%m%d",    // 20240115
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%Y-%b-%d",  // 2024-Jan-15
    ];

    formats
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .find(is_plausible)
}
