//! Calendar-day helpers. Every blocked date is a `NaiveDate`, so comparisons
//! and `YYYY-MM-DD` keys never depend on the server's UTC offset.

use chrono::{Days, NaiveDate};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Longest span, in nights, that bookings and availability ranges may cover.
pub const MAX_STAY_NIGHTS: i64 = 365;

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses a date-only string, or the date part of an ISO timestamp taken
/// literally (no offset conversion).
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    if raw.len() > 10 && !matches!(raw.as_bytes()[10], b'T' | b't' | b' ') {
        return None;
    }
    NaiveDate::parse_from_str(head, DAY_FORMAT).ok()
}

pub fn next_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_add_days(Days::new(1))
}

pub fn exceeds_max_stay(start: NaiveDate, end: NaiveDate) -> bool {
    end.signed_duration_since(start).num_days() > MAX_STAY_NIGHTS
}

/// Every day from `start` through `end`, both ends included.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stay_cap_counts_nights() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let last_allowed = start.checked_add_days(Days::new(365)).unwrap();
        assert!(!exceeds_max_stay(start, last_allowed));
        assert!(exceeds_max_stay(start, next_day(last_allowed).unwrap()));
        assert!(exceeds_max_stay(
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()
        ));
    }

    #[test]
    fn parse_day_accepts_plain_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(parse_day("2024-02-01"), expected);
        assert_eq!(parse_day("2024-02-01T23:30:00.000Z"), expected);
        assert_eq!(parse_day(" 2024-02-01 "), expected);
        assert_eq!(parse_day("2024-02-31"), None);
        assert_eq!(parse_day("2024-02-01x"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn days_inclusive_keeps_both_ends() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days: Vec<String> = days_inclusive(start, end).into_iter().map(format_day).collect();
        assert_eq!(days, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert!(days_inclusive(end, start).is_empty());
    }
}
