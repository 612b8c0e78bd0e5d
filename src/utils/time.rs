//! Time utilities: the persisted HH:MM:SS format and epoch helpers.

use chrono::{Local, NaiveTime, TimeZone};

/// Persisted time format (`Attendance.Time`).
pub const TIME_FMT: &str = "%H:%M:%S";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, TIME_FMT).ok()
}

/// Render unix seconds in local time, for humans.
pub fn describe_epoch(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("@{secs}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_are_required() {
        assert!(parse_time("08:30:05").is_some());
        assert!(parse_time("08:30").is_none());
    }

    #[test]
    fn out_of_range_epoch_falls_back() {
        assert_eq!(describe_epoch(i64::MAX), format!("@{}", i64::MAX));
        assert_eq!(describe_epoch(0).len(), 19);
    }
}
