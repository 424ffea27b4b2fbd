use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::reservation::create_reservation;

pub fn build_reservation_routers() -> Router<AppRegistry> {
    Router::new().route("/reservations", post(create_reservation))
}
