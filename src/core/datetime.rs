//! Display formatting for timestamps and durations.

use chrono::{DateTime, Duration, Local, Utc};

/// Literal shown for absent values (timestamps, unset labels).
pub const NOT_AVAILABLE: &str = "N/A";

/// Format an optional timestamp for display in local time.
///
/// Absent timestamps render as `N/A`.
#[must_use]
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |t| t.with_timezone(&Local).format("%c").to_string(),
    )
}

/// Format an optional timestamp as a short local time of day (`HH:MM:SS`).
#[must_use]
pub fn format_time_of_day(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
    )
}

/// Parse a duration string like "25m", "1h30m", "90s" or a bare number of seconds.
///
/// Returns `None` for malformed input and for totals chrono cannot represent.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(seconds) = s.parse::<i64>() {
        return (seconds >= 0).then(|| Duration::try_seconds(seconds)).flatten();
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else {
            if current_num.is_empty() {
                return None;
            }
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        }
    }

    // Trailing number without unit counts as seconds
    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_absent_timestamp_is_na() {
        assert_eq!(format_timestamp(None), "N/A");
        assert_eq!(format_time_of_day(None), "N/A");
    }

    #[test]
    fn test_present_timestamp_is_formatted() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let formatted = format_timestamp(Some(ts));
        assert_ne!(formatted, "N/A");
        assert!(formatted.contains("2024"));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("90"), Some(Duration::seconds(90)));
        assert_eq!(parse_duration("90s"), Some(Duration::seconds(90)));
        assert_eq!(parse_duration("2m"), Some(Duration::minutes(2)));
        assert_eq!(parse_duration("1h30m"), Some(Duration::minutes(90)));
        assert_eq!(parse_duration("1m30"), Some(Duration::seconds(90)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("abc").is_none());
        assert!(parse_duration("5x").is_none());
        assert!(parse_duration("-5").is_none());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        assert!(parse_duration("9999999999999999").is_none());
        assert!(parse_duration("9999999999999999h").is_none());
        assert!(parse_duration("99999999999999999999").is_none());
        assert!(parse_duration("4000000000000000000s1").is_none());
    }
}
