use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{stream, Stream};
use garde::Validate;
use kernel::{
    model::{
        availability::{AvailabilityOptions, BlockedDates},
        room::{find_room_type, RoomType},
    },
    service::session::AvailabilitySession,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::availability::{AvailabilityQuery, AvailabilityResponse, BlockedDatesResponse};

fn room_or_not_found(slug: &str) -> AppResult<&'static RoomType> {
    find_room_type(slug).ok_or_else(|| AppError::EntityNotFound(format!("unknown room: {slug}")))
}

pub async fn show_availability(
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    query.validate(&())?;

    let options = AvailabilityOptions::try_from(query)?;
    let room = room_or_not_found(options.room_type.as_str())?;

    registry
        .availability_service()
        .report(room, &options)
        .await
        .map(AvailabilityResponse::from)
        .map(Json)
}

/// Closes the session when the client goes away and the stream is dropped.
struct LiveSession(Option<AvailabilitySession>);

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Some(session) = self.0.take() {
            tracing::debug!(room = session.room().id, "Availability stream closed");
            session.close();
        }
    }
}

fn snapshot_event(room: &'static RoomType, blocked: &BlockedDates) -> Option<Event> {
    Event::default()
        .event("availability")
        .json_data(BlockedDatesResponse::new(room.id, blocked))
        .inspect_err(|e| tracing::error!(error.message = %e, "Could not encode availability"))
        .ok()
}

/// Merged blocked-date snapshots for the session's room: one right away,
/// then one per store change or finished feed fetch. Dropping the stream
/// closes the session.
fn availability_events(
    session: AvailabilitySession,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let initial = session.blocked();
    stream::unfold(
        (LiveSession(Some(session)), Some(initial)),
        |(mut live, pending)| async move {
            let session = match live.0.as_mut() {
                Some(session) => session,
                None => return None,
            };
            let blocked = match pending {
                Some(blocked) => blocked,
                None => match session.next_update().await {
                    Ok(Some(blocked)) => blocked,
                    Ok(None) => return None,
                    Err(e) => {
                        tracing::warn!(error.message = %e, "Availability stream ended");
                        return None;
                    }
                },
            };
            let event = match snapshot_event(session.room(), &blocked) {
                Some(event) => event,
                None => return None,
            };
            Some((Ok::<_, Infallible>(event), (live, None)))
        },
    )
}

pub async fn stream_availability(
    Path(room): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let room = room_or_not_found(&room)?;
    let session = AvailabilitySession::open(registry.availability_service(), room).await?;
    Ok(Sse::new(availability_events(session)).keep_alive(KeepAlive::default()))
}
