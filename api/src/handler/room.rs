use axum::Json;
use kernel::model::room::all_room_types;

use crate::model::room::RoomsResponse;

pub async fn show_room_list() -> Json<RoomsResponse> {
    Json(all_room_types().into())
}
