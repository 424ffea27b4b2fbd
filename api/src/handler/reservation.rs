use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::reservation::{CreateReservationRequest, CreateReservationResponse};

pub async fn create_reservation(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<CreateReservationResponse>)> {
    req.validate(&())?;

    registry
        .write_guard()
        .commit(req.into())
        .await
        .map(|committed| (StatusCode::CREATED, Json(committed.into())))
}
