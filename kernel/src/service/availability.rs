use chrono::NaiveDate;
use derive_new::new;
use serde::Serialize;
use shared::{config::CalendarConfig, error::AppResult};
use std::sync::Arc;

use crate::{
    model::{
        availability::{project, AvailabilityOptions, BlockedDates},
        calendar::blocked_dates_from_ical,
        occupancy::{self, OccupancyCheck, RoomSelection},
        room::RoomType,
    },
    repository::{
        calendar_feed::CalendarFeedRepository,
        reservation::{ReservationRepository, ReservationWatch},
    },
};

#[derive(Clone, new)]
pub struct AvailabilityService {
    reservations: Arc<dyn ReservationRepository>,
    feeds: Arc<dyn CalendarFeedRepository>,
    calendar: Arc<CalendarConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub room_type: &'static str,
    pub blocked: BlockedDates,
    /// Blocked days inside the requested range; empty when none was given.
    pub conflicts: Vec<NaiveDate>,
    pub range_available: Option<bool>,
    pub occupancy: OccupancyCheck,
    pub advisories: Vec<String>,
}

impl AvailabilityService {
    /// Blocked dates announced by the room's external feed. Any failure reads
    /// as "nothing blocked"; the write guard re-checks before every append.
    pub async fn fetch_remote(&self, room: &RoomType) -> Vec<NaiveDate> {
        let Some(url) = self.calendar.feed_url(room.id) else {
            return Vec::new();
        };
        match self.feeds.fetch_feed(url).await {
            Ok(body) => blocked_dates_from_ical(&body),
            Err(e) => {
                tracing::warn!(
                    room = room.id,
                    error.message = %e,
                    "External calendar unavailable, treating it as empty"
                );
                Vec::new()
            }
        }
    }

    pub async fn project_internal(&self, room: &RoomType) -> AppResult<Vec<NaiveDate>> {
        let reservations = self.reservations.find_all().await?;
        Ok(project(&room.room_type_id(), &reservations))
    }

    pub async fn merged(&self, room: &RoomType) -> AppResult<BlockedDates> {
        let (remote, internal) =
            tokio::join!(self.fetch_remote(room), self.project_internal(room));
        Ok(BlockedDates::merge(&remote, &internal?))
    }

    pub async fn watch(&self) -> AppResult<ReservationWatch> {
        self.reservations.watch().await
    }

    /// Answers the booking widget: what is blocked, whether the picked range
    /// is free, and whether the guests fit.
    pub async fn report(
        &self,
        room: &'static RoomType,
        options: &AvailabilityOptions,
    ) -> AppResult<AvailabilityReport> {
        let blocked = self.merged(room).await?;
        let conflicts = options
            .range
            .map(|range| blocked.conflicts(range.start_date, range.end_date))
            .unwrap_or_default();
        let range_available = options.range.map(|_| conflicts.is_empty());
        let occupancy = occupancy::validate(
            &[RoomSelection {
                room,
                qty: options.room.max(1),
            }],
            options.adult,
            options.children,
        );

        Ok(AvailabilityReport {
            room_type: room.id,
            blocked,
            conflicts,
            range_available,
            occupancy,
            advisories: room.advisories(),
        })
    }
}
