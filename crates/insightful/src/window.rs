//! Query windows from calendar dates in local time.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use insightful_core::TimeWindow;
use insightful_error::ValidationError;

/// Calendar date format accepted on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
#[track_caller]
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ValidationError::new(format!(
            "Invalid date '{}', expected YYYY-MM-DD: {}",
            value, e
        ))
    })
}

/// Milliseconds since the epoch at local midnight starting `date`.
#[track_caller]
pub fn local_midnight_ms(date: NaiveDate) -> Result<i64, ValidationError> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| ValidationError::new(format!("Local midnight does not exist on {}", date)))
}

/// Window from the start of `start_date` through the last millisecond of
/// `end_date`, both given as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if either date fails to parse or `end_date` precedes
/// `start_date`.
pub fn date_window(start_date: &str, end_date: &str) -> Result<TimeWindow, ValidationError> {
    let start = local_midnight_ms(parse_date(start_date)?)?;
    let end = local_midnight_ms(parse_date(end_date)?)?;
    TimeWindow::whole_days(start, end)
}

/// Window covering the `days` days before `now`.
///
/// # Errors
///
/// Returns an error if the start falls outside the representable date range.
#[track_caller]
pub fn lookback_window(days: u32, now: DateTime<Local>) -> Result<TimeWindow, ValidationError> {
    let start = TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| ValidationError::new(format!("Cannot look back {} days", days)))?;
    TimeWindow::new(start.timestamp_millis(), now.timestamp_millis())
}

/// Local calendar date containing `ms`, formatted with `format`.
pub fn format_local(ms: i64, format: &str) -> String {
    match Local.timestamp_millis_opt(ms).earliest() {
        Some(dt) => dt.format(format).to_string(),
        None => ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightful_core::MILLIS_PER_DAY;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(parse_date("02/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_single_day_window_is_inclusive() {
        let window = date_window("2024-02-01", "2024-02-01").unwrap();
        assert_eq!(window.end_ms() - window.start_ms(), MILLIS_PER_DAY - 1);
    }

    #[test]
    fn test_date_window_formats_back_to_inputs() {
        let window = date_window("2024-02-01", "2024-02-07").unwrap();
        assert_eq!(format_local(window.start_ms(), "%Y%m%d"), "20240201");
        assert_eq!(format_local(window.end_ms(), "%Y%m%d"), "20240207");
    }

    #[test]
    fn test_reversed_dates_rejected() {
        assert!(date_window("2024-02-07", "2024-02-01").is_err());
    }

    #[test]
    fn test_lookback_window() {
        let now = Local::now();
        let window = lookback_window(7, now).unwrap();
        assert_eq!(window.end_ms(), now.timestamp_millis());
        assert_eq!(window.duration_ms(), 7 * MILLIS_PER_DAY);
    }

    #[test]
    fn test_lookback_out_of_range_is_error() {
        assert!(lookback_window(100_000_000, Local::now()).is_err());
        assert!(lookback_window(u32::MAX, Local::now()).is_err());
    }
}
