use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use super::{CalendarEvent, EventStatus};

#[derive(Default)]
struct PendingEvent {
    start: Option<String>,
    end: Option<String>,
    status: Option<String>,
    summary: Option<String>,
}

impl PendingEvent {
    fn finish(self) -> Option<CalendarEvent> {
        let status = self.status.as_deref().map(EventStatus::from_ical);
        if status == Some(EventStatus::Cancelled) {
            return None;
        }
        let Some(start) = self.start.as_deref().and_then(parse_ical_date) else {
            tracing::debug!(dtstart = ?self.start, "Dropping VEVENT without a usable DTSTART");
            return None;
        };
        Some(CalendarEvent {
            start,
            end: self.end.as_deref().and_then(parse_ical_date),
            status,
            summary: self.summary,
        })
    }
}

/// Reads every `VEVENT` out of a calendar body. Cancelled events and events
/// without a usable start are dropped; nothing in the input aborts the parse.
pub fn parse_ical(text: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current: Option<PendingEvent> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(PendingEvent::default());
            continue;
        }
        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(event) = current.take().and_then(PendingEvent::finish) {
                events.push(event);
            }
            continue;
        }

        let Some(pending) = current.as_mut() else {
            continue;
        };
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.to_ascii_uppercase();
        let value = value.trim().to_string();

        if name.starts_with("DTSTART") {
            pending.start = Some(value);
        } else if name.starts_with("DTEND") {
            pending.end = Some(value);
        } else if name.starts_with("STATUS") {
            pending.status = Some(value);
        } else if name.starts_with("SUMMARY") {
            pending.summary = Some(value);
        }
    }

    events
}

/// `YYYYMMDD...` is read as a calendar date straight from its digits; anything
/// else goes through the generic ISO forms.
pub fn parse_ical_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let digits = value.as_bytes();
    if digits.len() >= 8 && digits[..8].iter().all(u8::is_ascii_digit) {
        let year = value[..4].parse().ok()?;
        let month = value[4..6].parse().ok()?;
        let day = value[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Local).date_naive());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(at.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// True when a body carries a calendar component. Guards against error pages
/// that come back with a 200.
pub fn looks_like_calendar(body: &str) -> bool {
    let upper = body.to_ascii_uppercase();
    ["BEGIN:VCALENDAR", "BEGIN:VEVENT", "BEGIN:VFREEBUSY"]
        .iter()
        .any(|marker| upper.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cancelled_events_are_excluded() {
        let text = "BEGIN:VCALENDAR\r\n\
            BEGIN:VEVENT\r\n\
            DTSTART;VALUE=DATE:20240110\r\n\
            DTEND;VALUE=DATE:20240113\r\n\
            STATUS:CONFIRMED\r\n\
            SUMMARY:Booked\r\n\
            END:VEVENT\r\n\
            BEGIN:VEVENT\r\n\
            DTSTART;VALUE=DATE:20240120\r\n\
            DTEND;VALUE=DATE:20240122\r\n\
            status:cancelled\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";

        let events = parse_ical(text);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, day(2024, 1, 10));
        assert_eq!(events[0].end, Some(day(2024, 1, 13)));
        assert_eq!(events[0].status, Some(EventStatus::Confirmed));
        assert_eq!(events[0].summary.as_deref(), Some("Booked"));
    }

    #[test]
    fn property_names_match_case_insensitively() {
        let text = "begin:vevent\ndtstart:20240301T140000Z\nDtEnd;TZID=Europe/Rome:20240303T100000\nend:vevent\n";
        let events = parse_ical(text);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, day(2024, 3, 1));
        assert_eq!(events[0].end, Some(day(2024, 3, 3)));
    }

    #[test]
    fn malformed_input_degrades_to_skipped_events() {
        let text = "garbage line\n\
            BEGIN:VEVENT\n\
            SUMMARY:no start here\n\
            END:VEVENT\n\
            BEGIN:VEVENT\n\
            DTSTART:not-a-date\n\
            END:VEVENT\n\
            BEGIN:VEVENT\n\
            this line has no colon\n\
            DTSTART:2024-05-02\n\
            END:VEVENT\n\
            DTSTART:20240601\n";

        let events = parse_ical(text);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, day(2024, 5, 2));
        assert_eq!(events[0].end, None);
    }

    #[test]
    fn unterminated_event_is_ignored() {
        assert!(parse_ical("BEGIN:VEVENT\nDTSTART:20240110\n").is_empty());
    }

    #[test]
    fn ical_date_forms() {
        assert_eq!(parse_ical_date("20240229"), Some(day(2024, 2, 29)));
        assert_eq!(parse_ical_date("20230229"), None);
        assert_eq!(parse_ical_date("2024-07-04T10:00:00"), Some(day(2024, 7, 4)));
        assert_eq!(parse_ical_date("2024-07-04"), Some(day(2024, 7, 4)));
        assert_eq!(parse_ical_date("tomorrow"), None);
    }

    #[test]
    fn calendar_sniffing() {
        assert!(looks_like_calendar("begin:vcalendar\nEND:VCALENDAR"));
        assert!(looks_like_calendar("BEGIN:VFREEBUSY"));
        assert!(!looks_like_calendar("<html><body>Sign in</body></html>"));
    }
}
