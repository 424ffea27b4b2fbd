use kernel::model::room::RoomType;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    #[serde(flatten)]
    pub room: &'static RoomType,
    /// Occupancy hints shown next to the room; never enforced.
    pub advisories: Vec<String>,
}

impl From<&'static RoomType> for RoomResponse {
    fn from(room: &'static RoomType) -> Self {
        Self {
            room,
            advisories: room.advisories(),
        }
    }
}

impl From<&'static [RoomType]> for RoomsResponse {
    fn from(rooms: &'static [RoomType]) -> Self {
        Self {
            items: rooms.iter().map(RoomResponse::from).collect(),
        }
    }
}
