use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{Guest, Reservation, SelectedRoom};
use crate::model::id::ReservationId;

/// One requested line of a booking: a room type and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    pub room_type: String,
    pub qty: u32,
}

/// A booking as submitted, before any check has run. Dates are kept raw so
/// the write guard decides what counts as present and parseable.
#[derive(Debug, Clone, new)]
pub struct ReservationCandidate {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub rooms: Vec<RoomRequest>,
    pub guest: Guest,
}

/// The document appended to the store once every check has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservation {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub selected_rooms: Vec<SelectedRoom>,
    pub guest: Guest,
    pub created_at: DateTime<Utc>,
    pub timestamp: i64,
}

impl CreateReservation {
    pub fn into_reservation(self, id: ReservationId) -> Reservation {
        let CreateReservation {
            check_in,
            check_out,
            adults,
            children,
            rooms,
            selected_rooms,
            guest,
            created_at,
            timestamp,
        } = self;
        Reservation {
            id,
            check_in,
            check_out,
            adults,
            children,
            rooms,
            selected_rooms,
            guest,
            created_at: Some(created_at),
            timestamp: Some(timestamp),
        }
    }
}
