use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::room::show_room_list;

pub fn build_room_routers() -> Router<AppRegistry> {
    Router::new().route("/rooms", get(show_room_list))
}
