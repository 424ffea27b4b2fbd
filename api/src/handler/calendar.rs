use axum::{
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use kernel::model::room::find_room_type;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::calendar::{BlockRequest, FetchIcalQuery, OkResponse};

/// Fetches an external calendar on behalf of the browser.
pub async fn fetch_ical(
    Query(query): Query<FetchIcalQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<impl IntoResponse> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("the url parameter is required".into()))?;

    let body = registry
        .calendar_feed_repository()
        .fetch_feed(&url)
        .await?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

pub async fn forward_block(
    State(registry): State<AppRegistry>,
    Json(req): Json<BlockRequest>,
) -> AppResult<Json<OkResponse>> {
    if req.action != "block" {
        return Err(AppError::InvalidRequest(format!(
            "unsupported action: {}",
            req.action
        )));
    }

    registry
        .channel_repository()
        .forward_block(req.reservation)
        .await
        .map(|_| Json(OkResponse::ok()))
}

/// Our own reservations for one room type as `text/calendar`. Accepts the
/// legacy `.ics` suffix.
pub async fn show_room_feed(
    Path(room): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<impl IntoResponse> {
    let slug = room.strip_suffix(".ics").unwrap_or(&room);
    let room = find_room_type(slug)
        .ok_or_else(|| AppError::EntityNotFound(format!("unknown room: {slug}")))?;

    let body = registry.calendar_publisher().publish(room).await?;
    Ok((
        [
            (CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.ics\"", room.id),
            ),
        ],
        body,
    ))
}
