use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{day::next_day, reservation::Reservation, room::RoomType};

const PRODID: &str = "-//Hotel Booking//Room Availability//EN";

/// Start of the placeholder event emitted for rooms without reservations;
/// the channel manager refuses feeds that contain no event at all.
pub const PLACEHOLDER_DAY: (i32, u32, u32) = (2099, 1, 1);

struct FeedWriter {
    out: String,
}

impl FeedWriter {
    fn new(calendar_name: &str) -> Self {
        let mut writer = Self { out: String::new() };
        writer.line("BEGIN:VCALENDAR");
        writer.line("VERSION:2.0");
        writer.line(&format!("PRODID:{PRODID}"));
        writer.line("CALSCALE:GREGORIAN");
        writer.line("METHOD:PUBLISH");
        writer.line(&format!("X-WR-CALNAME:{}", escape_text(calendar_name)));
        writer
    }

    fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push_str("\r\n");
    }

    fn event(
        &mut self,
        uid: &str,
        stamp: DateTime<Utc>,
        start: NaiveDate,
        end: NaiveDate,
        summary: &str,
        status: &str,
    ) {
        self.line("BEGIN:VEVENT");
        self.line(&format!("UID:{uid}"));
        self.line(&format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")));
        self.line(&format!("DTSTART;VALUE=DATE:{}", ical_day(start)));
        self.line(&format!("DTEND;VALUE=DATE:{}", ical_day(end)));
        self.line(&format!("SUMMARY:{}", escape_text(summary)));
        self.line(&format!("STATUS:{status}"));
        self.line("TRANSP:OPAQUE");
        self.line("END:VEVENT");
    }

    fn reservation(&mut self, reservation: &Reservation, stamp: DateTime<Utc>) {
        // Stored check-out is the departure day; iCal wants the day after the
        // last blocked one.
        let end = next_day(reservation.check_out).unwrap_or(reservation.check_out);
        self.event(
            &format!("{}@hotel-booking", reservation.id),
            stamp,
            reservation.check_in,
            end,
            "Reserved",
            "CONFIRMED",
        );
    }

    fn finish(mut self) -> String {
        self.line("END:VCALENDAR");
        self.out
    }
}

fn ical_day(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Builds the outbound feed for one room type from every stored reservation.
pub fn render_room_feed(
    room: &RoomType,
    reservations: &[Reservation],
    stamp: DateTime<Utc>,
) -> String {
    let room_id = room.room_type_id();
    let mut writer = FeedWriter::new(room.title);
    let mut emitted = 0usize;

    for reservation in reservations.iter().filter(|r| r.includes_room(&room_id)) {
        writer.reservation(reservation, stamp);
        emitted += 1;
    }

    if emitted == 0 {
        let (y, m, d) = PLACEHOLDER_DAY;
        if let Some(start) = NaiveDate::from_ymd_opt(y, m, d) {
            let end = next_day(start).unwrap_or(start);
            writer.event(
                &format!("placeholder-{}@hotel-booking", room.id),
                stamp,
                start,
                end,
                "Placeholder",
                "TENTATIVE",
            );
        }
    }

    writer.finish()
}

/// A one-event calendar describing a single reservation, sent along with
/// block requests to the channel manager.
pub fn render_reservation_event(reservation: &Reservation, stamp: DateTime<Utc>) -> String {
    let mut writer = FeedWriter::new("Reservation");
    writer.reservation(reservation, stamp);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        calendar::{blocked_dates_from_ical, parse_ical},
        day::format_day,
        room::find_room_type,
    };
    use crate::model::reservation::test_support::reservation;

    fn stamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn empty_feed_has_single_tentative_placeholder() {
        let room = find_room_type("room4").unwrap();
        let feed = render_room_feed(room, &[], stamp());

        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 1);
        assert!(feed.contains("STATUS:TENTATIVE"));
        assert!(feed.contains("DTSTART;VALUE=DATE:20990101"));
        assert!(feed.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(feed.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn feed_lists_matching_reservations_with_exclusive_end() {
        let room = find_room_type("room2").unwrap();
        let reservations = vec![
            reservation("2024-02-01", "2024-02-03", &["2"]),
            reservation("2024-02-10", "2024-02-12", &["room3"]),
            reservation("2024-03-01", "2024-03-02", &["room2"]),
        ];
        let feed = render_room_feed(room, &reservations, stamp());

        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 2);
        assert!(feed.contains("DTSTART;VALUE=DATE:20240201"));
        assert!(feed.contains("DTEND;VALUE=DATE:20240204"));
        assert!(!feed.contains("STATUS:TENTATIVE"));

        // Reading our own feed back blocks check-in through check-out.
        let days: Vec<String> = blocked_dates_from_ical(&feed)
            .into_iter()
            .map(format_day)
            .collect();
        assert_eq!(
            days,
            vec!["2024-02-01", "2024-02-02", "2024-02-03", "2024-03-01", "2024-03-02"]
        );
    }

    #[test]
    fn reservation_event_is_parseable() {
        let r = reservation("2024-05-05", "2024-05-07", &["room1"]);
        let events = parse_ical(&render_reservation_event(&r, stamp()));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Reserved"));
    }

    #[test]
    fn text_values_are_escaped() {
        assert_eq!(escape_text("Sea, Sun; Fun\n"), "Sea\\, Sun\\; Fun\\n");
    }
}
