//! Clock formatting and timestamp parsing.

use chrono::{DateTime, NaiveDateTime, NaiveTime};

use crate::filter::MinuteOfDay;

/// Naive layouts seen in trip exports, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Formats a minute of day as a short en-US clock string, e.g. `"2:00 PM"`.
pub fn format_time(minute: MinuteOfDay) -> String {
    let m = u32::from(minute.get());
    NaiveTime::from_hms_opt(m / 60, m % 60, 0)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

pub fn minutes_since_midnight(ts: &NaiveDateTime) -> MinuteOfDay {
    MinuteOfDay::of_time(&ts.time())
}

/// Parses a trip timestamp. Offsets are dropped in favour of the wall-clock
/// time they were recorded in. Returns `None` for anything unparseable.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minute(m: u16) -> MinuteOfDay {
        MinuteOfDay::new(m).unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(minute(0)), "12:00 AM");
        assert_eq!(format_time(minute(485)), "8:05 AM");
        assert_eq!(format_time(minute(720)), "12:00 PM");
        assert_eq!(format_time(minute(840)), "2:00 PM");
        assert_eq!(format_time(minute(1439)), "11:59 PM");
    }

    #[test]
    fn test_parse_bikeshare_export_format() {
        let ts = parse_timestamp("2024-03-01 08:05:00").unwrap();
        assert_eq!(minutes_since_midnight(&ts), minute(485));

        let ts = parse_timestamp("2024-03-01 08:20:13.296").unwrap();
        assert_eq!(minutes_since_midnight(&ts), minute(500));
    }

    #[test]
    fn test_parse_keeps_wall_clock_of_offset() {
        let ts = parse_timestamp("2024-03-01T08:05:00-05:00").unwrap();
        assert_eq!(minutes_since_midnight(&ts), minute(485));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("2024-13-40 25:00:00").is_none());
    }
}
