//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for message log entries.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp as a wall-clock `HH:MM:SS` string.
#[must_use]
pub fn clock(ts: Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_format_clock_with_zero_padding() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 7, 5, 9).unwrap();
        assert_eq!(clock(ts), "07:05:09");
    }
}
