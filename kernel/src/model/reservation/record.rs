use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use shared::error::{AppError, AppResult};

use super::{Guest, Reservation, SelectedRoom};
use crate::model::{
    day::{exceeds_max_stay, next_day, parse_day},
    id::ReservationId,
};

/// A reservation document exactly as the store hands it back. Older clients
/// wrote numbers as strings and room ids as bare numbers, so everything is
/// optional and loosely typed until `normalize` runs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationRecord {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub adults: Option<Value>,
    pub children: Option<Value>,
    pub rooms: Option<Value>,
    pub selected_rooms: Option<Vec<SelectedRoomRecord>>,
    pub guest: Option<GuestRecord>,
    pub created_at: Option<String>,
    pub timestamp: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SelectedRoomRecord {
    pub id: Option<Value>,
    pub title: Option<String>,
    pub price: Option<Value>,
    pub qty: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GuestRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

fn as_count(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ReservationRecord {
    /// Turns a stored document into the strict shape, or says why it can't.
    pub fn normalize(self, id: ReservationId) -> AppResult<Reservation> {
        let invalid = |why: &str| AppError::ConversionEntityError(format!("reservation {id}: {why}"));

        let check_in = self
            .check_in
            .as_deref()
            .ok_or_else(|| invalid("missing checkIn"))?;
        let check_out = self
            .check_out
            .as_deref()
            .ok_or_else(|| invalid("missing checkOut"))?;
        let check_in = parse_day(check_in).ok_or_else(|| invalid("unparseable checkIn"))?;
        let mut check_out = parse_day(check_out).ok_or_else(|| invalid("unparseable checkOut"))?;
        if check_out < check_in {
            return Err(invalid("checkOut before checkIn"));
        }
        if exceeds_max_stay(check_in, check_out) {
            return Err(invalid("stay longer than the allowed maximum"));
        }
        if check_out == check_in {
            check_out = next_day(check_in).ok_or_else(|| invalid("checkIn out of range"))?;
        }

        let selected_rooms = self
            .selected_rooms
            .unwrap_or_default()
            .into_iter()
            .map(|room| {
                let id = as_id(room.id.as_ref())?;
                Some(SelectedRoom {
                    title: room.title.unwrap_or_else(|| id.clone()),
                    price: as_count(room.price.as_ref()).unwrap_or(0),
                    qty: as_count(room.qty.as_ref()).unwrap_or(1),
                    id,
                })
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid("selected room without an id"))?;
        if selected_rooms.is_empty() {
            return Err(invalid("no selected rooms"));
        }

        let rooms = as_count(self.rooms.as_ref())
            .unwrap_or_else(|| selected_rooms.iter().map(|s| s.qty).sum());
        let timestamp = self.timestamp.as_ref().and_then(Value::as_i64);
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc))
            .or_else(|| timestamp.and_then(DateTime::<Utc>::from_timestamp_millis));

        let guest = self.guest.unwrap_or_default();

        Ok(Reservation {
            id,
            check_in,
            check_out,
            adults: as_count(self.adults.as_ref()).unwrap_or(0),
            children: as_count(self.children.as_ref()).unwrap_or(0),
            rooms,
            selected_rooms,
            guest: Guest {
                name: guest.name.unwrap_or_default(),
                email: guest.email.unwrap_or_default(),
                phone: guest.phone,
                notes: guest.notes,
            },
            created_at,
            timestamp,
        })
    }
}

/// Normalizes a full scan of the store. Bad documents are reported one by one
/// and left out; they never fail the batch.
pub fn normalize_all(records: Vec<(ReservationId, ReservationRecord)>) -> Vec<Reservation> {
    records
        .into_iter()
        .filter_map(|(id, record)| match record.normalize(id) {
            Ok(reservation) => Some(reservation),
            Err(e) => {
                tracing::warn!(reservation.id = %id, error.message = %e, "Skipping invalid reservation record");
                None
            }
        })
        .collect()
}
