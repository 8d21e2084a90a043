// Time string helpers
// The backend speaks minute-precision 24-hour "HH:MM" strings

use chrono::{NaiveTime, Timelike};

/// Parse a strict "HH:MM" time string.
///
/// Returns `None` for anything malformed (bad separators, out-of-range
/// fields, trailing seconds). Callers revert to their last valid value.
pub fn parse_hhmm(input: &str) -> Option<NaiveTime> {
    let (h, m) = input.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Format a time as "HH:MM", dropping seconds.
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Minutes since midnight for a time-of-day.
pub fn minutes_of_day(time: NaiveTime) -> i64 {
    time.hour() as i64 * 60 + time.minute() as i64
}
