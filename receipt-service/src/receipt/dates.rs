//! Display formatting for stored payment dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Postgres `timestamptz::text`, where the offset may omit minutes (`+08`).
const OFFSET_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

const DATE_FORMAT: &str = "%Y-%m-%d";

const DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Format a stored date or date-time as `JANUARY 05, 2024`.
///
/// Unparseable input is returned uppercased rather than failing the receipt.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();

    // Offset timestamps keep the calendar date of their own offset.
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, OFFSET_DATETIME_FORMAT))
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok());

    match parsed {
        Some(date) => date.format(DISPLAY_FORMAT).to_string().to_uppercase(),
        None => {
            tracing::debug!(raw = %raw, "Unrecognised payment date format");
            raw.to_uppercase()
        }
    }
}
