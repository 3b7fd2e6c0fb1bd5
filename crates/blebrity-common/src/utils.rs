//! Utility functions used across the Blebrity crates

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Timestamp type used throughout the application
pub type Timestamp = DateTime<Utc>;

/// Display format for event times, matching a US-English locale string
pub const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Get the current timestamp
pub fn now() -> Timestamp {
    Utc::now()
}

/// Calendar date of a timestamp in UTC
pub fn utc_date(timestamp: &Timestamp) -> NaiveDate {
    timestamp.date_naive()
}

/// Parse a stored `created_at` value
///
/// Accepts RFC 3339 with any offset, and offset-less ISO strings which are
/// taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a stored `created_at` value for display in the given timezone
///
/// Unparseable values are returned unchanged.
pub fn format_display_timestamp(created_at: &str, tz: Tz) -> String {
    match parse_timestamp(created_at) {
        Some(ts) => ts.with_timezone(&tz).format(DISPLAY_FORMAT).to_string(),
        None => created_at.to_string(),
    }
}

/// Format a timestamp for log lines
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:05+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T04:04:05+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:05"), Some(expected));
        assert!(parse_timestamp("2024-01-02T03:04:05.123456+00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_format_display_timestamp() {
        assert_eq!(
            format_display_timestamp("2024-01-02T15:04:05Z", Tz::UTC),
            "1/2/2024, 3:04:05 PM"
        );
        assert_eq!(
            format_display_timestamp("2024-07-01T00:30:00Z", chrono_tz::America::New_York),
            "6/30/2024, 8:30:00 PM"
        );
        assert_eq!(format_display_timestamp("garbage", Tz::UTC), "garbage");
    }

    #[test]
    fn test_utc_date() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(utc_date(&ts), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(format_timestamp(&ts), "2024-12-31 23:59:59 UTC");
    }
}
