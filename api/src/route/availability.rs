use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::availability::{show_availability, stream_availability};

pub fn build_availability_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/", get(show_availability))
        .route("/:room/events", get(stream_availability));

    Router::new().nest("/availability", routers)
}
