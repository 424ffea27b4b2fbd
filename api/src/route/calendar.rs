use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::calendar::{fetch_ical, forward_block, show_room_feed};

pub fn build_calendar_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/fetch-ical", get(fetch_ical).post(forward_block))
        .route("/ical/:room", get(show_room_feed))
}
