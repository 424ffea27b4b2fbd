use kernel::model::{id::ReservationId, reservation::record::ReservationRecord};
use serde_json::Value;
use sqlx::types::{Json, Uuid};

// One document of the reservations collection, as stored.
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: Uuid,
    pub document: Json<Value>,
}

impl ReservationRow {
    /// Documents that are not even JSON objects of the expected shape are
    /// reported and dropped here; field-level checks happen in the kernel.
    pub fn into_record(self) -> Option<(ReservationId, ReservationRecord)> {
        let ReservationRow {
            reservation_id,
            document: Json(document),
        } = self;
        let id = ReservationId::from(reservation_id);
        if !document.is_object() {
            tracing::warn!(reservation.id = %id, "Skipping reservation document that is not an object");
            return None;
        }
        match serde_json::from_value::<ReservationRecord>(document) {
            Ok(record) => Some((id, record)),
            Err(e) => {
                tracing::warn!(reservation.id = %id, error.message = %e, "Skipping undecodable reservation document");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn undecodable_documents_are_dropped() {
        let row = ReservationRow {
            reservation_id: Uuid::new_v4(),
            document: Json(json!(["not", "an", "object"])),
        };
        assert!(row.into_record().is_none());

        let row = ReservationRow {
            reservation_id: Uuid::new_v4(),
            document: Json(json!("2024-01-01")),
        };
        assert!(row.into_record().is_none());

        let row = ReservationRow {
            reservation_id: Uuid::new_v4(),
            document: Json(json!({ "checkIn": 20240101 })),
        };
        assert!(row.into_record().is_none());

        let row = ReservationRow {
            reservation_id: Uuid::new_v4(),
            document: Json(json!({ "checkIn": "2024-01-01", "unknown": true })),
        };
        let (_, record) = row.into_record().unwrap();
        assert_eq!(record.check_in.as_deref(), Some("2024-01-01"));
    }
}
