//! Parsing and formatting of the API's timestamp strings.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parse an API timestamp.
///
/// Accepts RFC 3339 (`2024-03-16T10:00:00.000+05:30`), offset-less
/// date-times (taken as UTC) and bare dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Format as `DD-MM-YYYY` using the calendar date in the timestamp's own
/// offset. Unparseable input yields an empty string.
pub fn format_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%d-%m-%Y").to_string())
        .unwrap_or_default()
}
