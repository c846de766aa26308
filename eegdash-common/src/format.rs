//! Display formatting for dates and file sizes
//!
//! Backend timestamps may be missing, zero-valued or in several layouts, so
//! formatting never fails: bad input renders as `No Date` or `Invalid Date`.
//! All output is rendered in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// `May 1, 2024 10:30`
pub const FULL_DATETIME: &str = "%b %-d, %Y %H:%M";
/// `May 1, 2024`
pub const DATE_ONLY: &str = "%b %-d, %Y";
/// `10:30:05`
pub const TIME_ONLY: &str = "%H:%M:%S";
/// `10:30:05.123`
pub const TIME_WITH_MS: &str = "%H:%M:%S%.3f";
/// `2024-05-01`
pub const ISO_DATE: &str = "%Y-%m-%d";
/// `2024-05-01T10:30:05`
pub const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

const NO_DATE: &str = "No Date";
const INVALID_DATE: &str = "Invalid Date";

/// Parse a backend timestamp
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS`
/// and bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, ISO_DATE)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// True when `value` is present and parses as a timestamp
pub fn is_valid_date(value: Option<&str>) -> bool {
    value.and_then(parse_timestamp).is_some()
}

/// Format a possibly missing timestamp with a strftime layout
///
/// # Examples
///
/// ```
/// use eegdash_common::format::{format_safe_date, DATE_ONLY, FULL_DATETIME};
///
/// assert_eq!(format_safe_date(Some("2024-05-01T10:30:00Z"), FULL_DATETIME), "May 1, 2024 10:30");
/// assert_eq!(format_safe_date(Some("2024-05-01"), DATE_ONLY), "May 1, 2024");
/// assert_eq!(format_safe_date(None, DATE_ONLY), "No Date");
/// assert_eq!(format_safe_date(Some("yesterday"), DATE_ONLY), "Invalid Date");
/// ```
pub fn format_safe_date(value: Option<&str>, layout: &str) -> String {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return NO_DATE.to_string();
    };

    match parse_timestamp(raw) {
        Some(dt) => dt.format(layout).to_string(),
        None => {
            tracing::debug!(value = raw, "Unparseable timestamp");
            INVALID_DATE.to_string()
        }
    }
}

/// Format a byte count with binary units and at most two decimals
///
/// # Examples
///
/// ```
/// use eegdash_common::format::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1024), "1 KB");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
