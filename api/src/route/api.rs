use super::{
    admin::build_admin_routers, availability::build_availability_routers,
    calendar::build_calendar_routers, health::build_health_check_routers,
    reservation::build_reservation_routers, room::build_room_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_room_routers())
        .merge(build_availability_routers())
        .merge(build_calendar_routers())
        .merge(build_reservation_routers())
        .merge(build_admin_routers());
    Router::new().nest("/api", router)
}
