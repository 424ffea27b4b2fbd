use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::reservation::Reservation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStats {
    pub reservations: u64,
    pub nights: u64,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_reservations: u64,
    pub total_nights: u64,
    pub total_guests: u64,
    pub estimated_revenue: u64,
    pub upcoming_arrivals: u64,
    pub per_room: BTreeMap<String, RoomStats>,
}

impl BookingStats {
    pub fn collect(reservations: &[Reservation], today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for r in reservations {
            let nights = r.nights() as u64;
            stats.total_reservations += 1;
            stats.total_nights += nights;
            stats.total_guests += u64::from(r.adults) + u64::from(r.children);
            stats.estimated_revenue += r.nightly_total() * nights;
            if r.check_in >= today {
                stats.upcoming_arrivals += 1;
            }
            for selected in &r.selected_rooms {
                let key = if selected.id.starts_with(|c: char| c.is_ascii_digit()) {
                    format!("room{}", selected.id)
                } else {
                    selected.id.clone()
                };
                let entry = stats.per_room.entry(key).or_default();
                entry.reservations += 1;
                entry.nights += nights * u64::from(selected.qty);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reservation::test_support::reservation;

    #[test]
    fn collects_totals_and_folds_legacy_ids() {
        let reservations = vec![
            reservation("2024-02-01", "2024-02-03", &["2"]),
            reservation("2024-03-01", "2024-03-04", &["room2", "room5"]),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let stats = BookingStats::collect(&reservations, today);

        assert_eq!(stats.total_reservations, 2);
        assert_eq!(stats.total_nights, 5);
        assert_eq!(stats.total_guests, 4);
        assert_eq!(stats.estimated_revenue, 50 * 2 + 100 * 3);
        assert_eq!(stats.upcoming_arrivals, 1);
        assert_eq!(stats.per_room["room2"].reservations, 2);
        assert_eq!(stats.per_room["room2"].nights, 5);
        assert_eq!(stats.per_room["room5"].reservations, 1);
    }
}
