use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::admin::show_stats;

pub fn build_admin_routers() -> Router<AppRegistry> {
    Router::new().route("/admin/stats", get(show_stats))
}
