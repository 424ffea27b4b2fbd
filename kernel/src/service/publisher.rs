use chrono::Utc;
use derive_new::new;
use shared::error::AppResult;
use std::sync::Arc;

use crate::{
    model::{calendar::render_room_feed, room::RoomType},
    repository::reservation::ReservationRepository,
};

/// Serves our own reservations back out as an iCal feed per room type.
#[derive(Clone, new)]
pub struct CalendarPublisher {
    reservations: Arc<dyn ReservationRepository>,
}

impl CalendarPublisher {
    pub async fn publish(&self, room: &RoomType) -> AppResult<String> {
        let reservations = self.reservations.find_all().await?;
        Ok(render_room_feed(room, &reservations, Utc::now()))
    }
}
