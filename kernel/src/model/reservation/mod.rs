use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{day::days_inclusive, id::ReservationId, room::RoomTypeId};

pub mod event;
pub mod record;

/// Snapshot of a catalog room at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRoom {
    pub id: String,
    pub title: String,
    pub price: u32,
    pub qty: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub selected_rooms: Vec<SelectedRoom>,
    pub guest: Guest,
    pub created_at: Option<DateTime<Utc>>,
    pub timestamp: Option<i64>,
}

impl Reservation {
    pub fn includes_room(&self, room: &RoomTypeId) -> bool {
        self.selected_rooms.iter().any(|s| room.matches(&s.id))
    }

    /// Days this reservation keeps off the market: check-in through
    /// check-out, both included, so turnover day stays blocked.
    pub fn blocked_days(&self) -> Vec<NaiveDate> {
        days_inclusive(self.check_in, self.check_out)
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(0)
    }

    pub fn nightly_total(&self) -> u64 {
        self.selected_rooms
            .iter()
            .map(|s| u64::from(s.price) * u64::from(s.qty))
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::day::parse_day;

    pub fn reservation(check_in: &str, check_out: &str, room_ids: &[&str]) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            check_in: parse_day(check_in).unwrap(),
            check_out: parse_day(check_out).unwrap(),
            adults: 2,
            children: 0,
            rooms: room_ids.len() as u32,
            selected_rooms: room_ids
                .iter()
                .map(|id| SelectedRoom {
                    id: id.to_string(),
                    title: format!("Room {id}"),
                    price: 50,
                    qty: 1,
                })
                .collect(),
            guest: Guest {
                name: "Ada Guest".into(),
                email: "ada@example.com".into(),
                ..Default::default()
            },
            created_at: None,
            timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::reservation;
    use super::*;

    #[test]
    fn blocked_days_include_checkout() {
        let r = reservation("2024-02-01", "2024-02-03", &["2"]);
        assert_eq!(r.blocked_days().len(), 3);
        assert_eq!(r.nights(), 2);
        assert!(r.includes_room(&RoomTypeId::new("room2")));
        assert!(!r.includes_room(&RoomTypeId::new("room3")));
    }

    #[test]
    fn nightly_total_sums_quantities() {
        let mut r = reservation("2024-02-01", "2024-02-03", &["room1", "room2"]);
        r.selected_rooms[1].qty = 2;
        assert_eq!(r.nightly_total(), 150);
    }
}
