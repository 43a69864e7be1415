//! Shared date-input grammar
//!
//! Every command flag and filter value that names a moment goes through one
//! parser. Inputs are interpreted in the local timezone and resolved to UTC
//! instants. Accepted forms:
//!
//! - `now` / `n` - this moment
//! - `today` / `t`, `yesterday` / `y`, `tomorrow` / `o` - start of that day
//! - a signed integer - day offset from today, start of day (`-3`, `2`)
//! - `H:mm` - today at that time
//! - `YYYY-MM-DD` - start of that day
//! - `YYYY-MM-DD H:mm` - that moment

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("unrecognized date input '{0}' (try 'today', 'now', '-3', '14:30', or '2026-03-10 14:30')")]
    Unrecognized(String),

    #[error("'{0}' does not exist in the local timezone")]
    NonexistentLocalTime(String),
}

/// Parse a date input against the current moment
pub fn parse_date_input(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    parse_date_input_at(input, Local::now())
}

/// Parse a date input against an explicit "now" (injectable for tests and
/// for commands that resolve several inputs against one moment)
pub fn parse_date_input_at(
    input: &str,
    now: DateTime<Local>,
) -> Result<DateTime<Utc>, DateParseError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    let today = now.date_naive();

    match lower.as_str() {
        "now" | "n" => return Ok(now.with_timezone(&Utc)),
        "today" | "t" => return start_of_day(today),
        "yesterday" | "y" => return start_of_day(today - Duration::days(1)),
        "tomorrow" | "o" => return start_of_day(today + Duration::days(1)),
        _ => {}
    }

    // signed day offset from today
    if let Ok(offset) = lower.parse::<i64>() {
        return start_of_day(today + Duration::days(offset));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return to_utc(naive);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return start_of_day(date);
    }

    // clock time on today's date
    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return to_utc(today.and_time(time));
    }

    Err(DateParseError::Unrecognized(input.to_string()))
}

fn start_of_day(date: NaiveDate) -> Result<DateTime<Utc>, DateParseError> {
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => to_utc(naive),
        None => Err(DateParseError::Unrecognized(date.to_string())),
    }
}

fn to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>, DateParseError> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        // DST fold: take the earlier reading
        LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => Err(DateParseError::NonexistentLocalTime(naive.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn local_instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_now_keyword() {
        let now = fixed_now();
        assert_eq!(
            parse_date_input_at("now", now).unwrap(),
            now.with_timezone(&Utc)
        );
        assert_eq!(
            parse_date_input_at("N", now).unwrap(),
            now.with_timezone(&Utc)
        );
    }

    #[test]
    fn test_day_keywords() {
        let now = fixed_now();
        assert_eq!(
            parse_date_input_at("today", now).unwrap(),
            local_instant(2026, 3, 10, 0, 0)
        );
        assert_eq!(
            parse_date_input_at("yesterday", now).unwrap(),
            local_instant(2026, 3, 9, 0, 0)
        );
        assert_eq!(
            parse_date_input_at("tomorrow", now).unwrap(),
            local_instant(2026, 3, 11, 0, 0)
        );
        assert_eq!(
            parse_date_input_at("o", now).unwrap(),
            local_instant(2026, 3, 11, 0, 0)
        );
    }

    #[test]
    fn test_day_offsets() {
        let now = fixed_now();
        assert_eq!(
            parse_date_input_at("-3", now).unwrap(),
            local_instant(2026, 3, 7, 0, 0)
        );
        assert_eq!(
            parse_date_input_at("2", now).unwrap(),
            local_instant(2026, 3, 12, 0, 0)
        );
        assert_eq!(
            parse_date_input_at("0", now).unwrap(),
            local_instant(2026, 3, 10, 0, 0)
        );
    }

    #[test]
    fn test_clock_time_is_today() {
        let now = fixed_now();
        assert_eq!(
            parse_date_input_at("14:30", now).unwrap(),
            local_instant(2026, 3, 10, 14, 30)
        );
        assert_eq!(
            parse_date_input_at("9:05", now).unwrap(),
            local_instant(2026, 3, 10, 9, 5)
        );
    }

    #[test]
    fn test_calendar_forms() {
        let now = fixed_now();
        assert_eq!(
            parse_date_input_at("2026-05-01", now).unwrap(),
            local_instant(2026, 5, 1, 0, 0)
        );
        assert_eq!(
            parse_date_input_at("2026-05-01 08:15", now).unwrap(),
            local_instant(2026, 5, 1, 8, 15)
        );
    }

    #[test]
    fn test_rejects_out_of_range_clock_times() {
        let now = fixed_now();
        assert!(parse_date_input_at("25:00", now).is_err());
        assert!(parse_date_input_at("12:61", now).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let now = fixed_now();
        let err = parse_date_input_at("someday", now).unwrap_err();
        assert!(matches!(err, DateParseError::Unrecognized(_)));
    }
}
