use chrono::NaiveDate;
use serde::Serialize;

pub mod export;
pub mod parse;

pub use export::{render_reservation_event, render_room_feed};
pub use parse::{looks_like_calendar, parse_ical};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
    Other,
}

impl EventStatus {
    pub fn from_ical(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => Self::Confirmed,
            "TENTATIVE" => Self::Tentative,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

/// A blocking event read from an external feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub start: NaiveDate,
    /// Exclusive, as for iCal `DATE` values. `None` means a one-day event.
    pub end: Option<NaiveDate>,
    pub status: Option<EventStatus>,
    pub summary: Option<String>,
}

/// Expands `[start, end)` into one entry per day. An event without an end,
/// or whose end does not come after its start, blocks its start day only.
pub fn expand(event: &CalendarEvent) -> Vec<NaiveDate> {
    match event.end {
        Some(end) if end > event.start => {
            event.start.iter_days().take_while(|d| *d < end).collect()
        }
        _ => vec![event.start],
    }
}

/// Parses a feed body and expands every surviving event.
pub fn blocked_dates_from_ical(text: &str) -> Vec<NaiveDate> {
    parse_ical(text).iter().flat_map(expand).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::day::format_day;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expand_treats_end_as_exclusive() {
        let event = CalendarEvent {
            start: day(2024, 1, 10),
            end: Some(day(2024, 1, 13)),
            status: None,
            summary: None,
        };
        assert_eq!(
            expand(&event),
            vec![day(2024, 1, 10), day(2024, 1, 11), day(2024, 1, 12)]
        );
    }

    #[test]
    fn expand_without_end_covers_start_only() {
        let event = CalendarEvent {
            start: day(2024, 1, 10),
            end: None,
            status: None,
            summary: None,
        };
        assert_eq!(expand(&event), vec![day(2024, 1, 10)]);

        let inverted = CalendarEvent {
            end: Some(day(2024, 1, 9)),
            ..event
        };
        assert_eq!(expand(&inverted), vec![day(2024, 1, 10)]);
    }

    #[test]
    fn expanded_days_format_without_shift() {
        let text = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nDTSTART;VALUE=DATE:20241231\nDTEND;VALUE=DATE:20250102\nEND:VEVENT\nEND:VCALENDAR\n";
        let keys: Vec<String> = blocked_dates_from_ical(text).into_iter().map(format_day).collect();
        assert_eq!(keys, vec!["2024-12-31", "2025-01-01"]);
    }
}
