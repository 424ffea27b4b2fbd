use axum::{extract::State, Json};
use chrono::Local;
use kernel::model::stats::BookingStats;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::extractor::AdminUser;

pub async fn show_stats(
    _admin: AdminUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingStats>> {
    let reservations = registry.reservation_repository().find_all().await?;
    Ok(Json(BookingStats::collect(
        &reservations,
        Local::now().date_naive(),
    )))
}
