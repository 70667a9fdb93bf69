//! Conversions between close-approach calendar dates and output timestamps.

use chrono::NaiveDateTime;

/// Calendar date format used by the `cd` field, e.g. `2025-Jan-01 00:00`.
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Format used for `datetime_utc` in written results.
pub const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a close-approach calendar date (UTC, minute precision).
pub fn cd_to_datetime(calendar_date: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(calendar_date.trim(), CALENDAR_DATE_FORMAT)
}

pub fn datetime_to_str(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_DATETIME_FORMAT).to_string()
}
