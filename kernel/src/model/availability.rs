use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{
    day::{days_inclusive, format_day},
    reservation::Reservation,
    room::RoomTypeId,
};

/// Blocked dates for a single room type, merged from every source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockedDates {
    /// Concatenation of all sources; may repeat a day.
    pub list: Vec<NaiveDate>,
    /// `YYYY-MM-DD` keys for membership checks.
    pub lookup: BTreeSet<String>,
}

impl BlockedDates {
    /// Union of the external-feed dates and the store-derived dates.
    pub fn merge(remote: &[NaiveDate], internal: &[NaiveDate]) -> Self {
        let list: Vec<NaiveDate> = remote.iter().chain(internal).copied().collect();
        let lookup = list.iter().copied().map(format_day).collect();
        Self { list, lookup }
    }

    pub fn is_blocked(&self, day: NaiveDate) -> bool {
        self.lookup.contains(&format_day(day))
    }

    /// Blocked days inside `[start, end]`, both ends included.
    pub fn conflicts(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        days_inclusive(start, end)
            .into_iter()
            .filter(|d| self.is_blocked(*d))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// Days blocked for `room` by reservations already in the store.
pub fn project(room: &RoomTypeId, reservations: &[Reservation]) -> Vec<NaiveDate> {
    reservations
        .iter()
        .filter(|r| r.includes_room(room))
        .flat_map(Reservation::blocked_days)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// What the booking widget currently has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityOptions {
    pub room_type: RoomTypeId,
    pub adult: u32,
    pub children: u32,
    pub room: u32,
    pub range: Option<DateRange>,
}
