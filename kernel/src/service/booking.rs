use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use shared::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    model::{
        availability::BlockedDates,
        calendar::render_reservation_event,
        day::{exceeds_max_stay, format_day, next_day, parse_day, MAX_STAY_NIGHTS},
        occupancy::{self, RoomSelection},
        reservation::{
            event::{CreateReservation, ReservationCandidate, RoomRequest},
            Reservation, SelectedRoom,
        },
        room::{find_room_type, RoomType},
    },
    repository::{channel::ChannelRepository, reservation::ReservationRepository},
    service::availability::AvailabilityService,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedReservation {
    pub reservation: Reservation,
    /// Set when the reservation was stored but the channel push failed.
    pub warning: Option<String>,
}

/// Last check before a reservation is appended. Everything is re-validated
/// against freshly merged availability, whatever the widget showed earlier.
#[derive(Clone)]
pub struct ReservationWriteGuard {
    availability: AvailabilityService,
    reservations: Arc<dyn ReservationRepository>,
    channel: Arc<dyn ChannelRepository>,
    // Serializes check-then-append within this process.
    commit_lock: Arc<Mutex<()>>,
}

impl ReservationWriteGuard {
    pub fn new(
        availability: AvailabilityService,
        reservations: Arc<dyn ReservationRepository>,
        channel: Arc<dyn ChannelRepository>,
    ) -> Self {
        Self {
            availability,
            reservations,
            channel,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn commit(&self, candidate: ReservationCandidate) -> AppResult<CommittedReservation> {
        let selections = resolve_rooms(&candidate.rooms)?;
        let (check_in, check_out) =
            stay_dates(candidate.check_in.as_deref(), candidate.check_out.as_deref())?;

        let occupancy = occupancy::validate(&selections, candidate.adults, candidate.children);
        if !occupancy.ok {
            return Err(AppError::UnprocessableEntity(
                occupancy
                    .reason
                    .unwrap_or_else(|| "The selected rooms cannot hold this party.".into()),
            ));
        }

        let rooms = distinct_rooms(&selections);
        let mut remote = Vec::with_capacity(rooms.len());
        for room in &rooms {
            remote.push(self.availability.fetch_remote(room).await);
        }

        // Only the store re-read, the conflict check and the append are serialized.
        let reservation = {
            let _serialized = self.commit_lock.lock().await;

            let mut conflicts = Vec::new();
            for (room, remote) in rooms.iter().zip(&remote) {
                let internal = self.availability.project_internal(room).await?;
                let days = BlockedDates::merge(remote, &internal).conflicts(check_in, check_out);
                if !days.is_empty() {
                    let days: Vec<String> = days.into_iter().map(format_day).collect();
                    conflicts.push(format!("{}: {}", room.title, days.join(", ")));
                }
            }
            if !conflicts.is_empty() {
                tracing::info!(conflicts = ?conflicts, "Reservation rejected on blocked dates");
                return Err(AppError::BookingConflict(format!(
                    "These dates are no longer available. {}",
                    conflicts.join("; ")
                )));
            }

            let now = Utc::now();
            let event = CreateReservation::new(
                check_in,
                check_out,
                candidate.adults,
                candidate.children,
                selections.iter().map(|s| s.qty).sum(),
                selections.iter().map(snapshot).collect(),
                candidate.guest,
                now,
                now.timestamp_millis(),
            );
            self.reservations.create(event).await?
        };

        tracing::info!(reservation.id = %reservation.id, "Reservation stored");
        let warning = self.push_to_channel(&reservation).await;

        Ok(CommittedReservation {
            reservation,
            warning,
        })
    }

    // Best effort. The reservation is already stored whatever happens here.
    async fn push_to_channel(&self, reservation: &Reservation) -> Option<String> {
        let mut payload = serde_json::to_value(reservation).unwrap_or_default();
        if let Value::Object(fields) = &mut payload {
            fields.insert(
                "ical".into(),
                Value::String(render_reservation_event(reservation, Utc::now())),
            );
        }

        match self.channel.forward_block(payload).await {
            Ok(()) => None,
            Err(AppError::NotConfigured(why)) => {
                tracing::debug!(reason = %why, "Channel push skipped");
                None
            }
            Err(e) => {
                tracing::warn!(
                    reservation.id = %reservation.id,
                    error.message = %e,
                    "Channel manager was not updated"
                );
                Some(format!(
                    "Your reservation is confirmed, but the booking channel could not be updated: {e}"
                ))
            }
        }
    }
}

fn resolve_rooms(requests: &[RoomRequest]) -> AppResult<Vec<RoomSelection>> {
    let mut selections = Vec::new();
    for request in requests.iter().filter(|r| r.qty > 0) {
        let room = find_room_type(&request.room_type).ok_or_else(|| {
            AppError::UnprocessableEntity(format!("Unknown room type: {}", request.room_type))
        })?;
        selections.push(RoomSelection {
            room,
            qty: request.qty,
        });
    }
    if selections.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Please select at least one room.".into(),
        ));
    }
    Ok(selections)
}

fn stay_dates(check_in: Option<&str>, check_out: Option<&str>) -> AppResult<(NaiveDate, NaiveDate)> {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Err(AppError::UnprocessableEntity(
            "Check-in and check-out dates are required.".into(),
        ));
    };
    let parse = |raw: &str| {
        parse_day(raw)
            .ok_or_else(|| AppError::UnprocessableEntity(format!("Not a valid date: {raw}")))
    };
    let check_in = parse(check_in)?;
    let check_out = parse(check_out)?;

    if check_out < check_in {
        return Err(AppError::UnprocessableEntity(
            "Check-out must be after check-in.".into(),
        ));
    }
    if exceeds_max_stay(check_in, check_out) {
        return Err(AppError::UnprocessableEntity(format!(
            "Stays are limited to {MAX_STAY_NIGHTS} nights."
        )));
    }
    if check_out == check_in {
        let bumped = next_day(check_in).ok_or_else(|| {
            AppError::UnprocessableEntity(format!("Not a valid date: {}", format_day(check_in)))
        })?;
        return Ok((check_in, bumped));
    }
    Ok((check_in, check_out))
}

fn distinct_rooms(selections: &[RoomSelection]) -> Vec<&'static RoomType> {
    let mut rooms: Vec<&'static RoomType> = Vec::new();
    for s in selections {
        if !rooms.iter().any(|r| r.id == s.room.id) {
            rooms.push(s.room);
        }
    }
    rooms
}

fn snapshot(selection: &RoomSelection) -> SelectedRoom {
    SelectedRoom {
        id: selection.room.id.to_string(),
        title: selection.room.title.to_string(),
        price: selection.room.price,
        qty: selection.qty,
    }
}
