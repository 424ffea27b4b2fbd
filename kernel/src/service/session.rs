use chrono::NaiveDate;
use shared::error::AppResult;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::mpsc;

use crate::{
    model::{availability::BlockedDates, room::RoomType},
    repository::reservation::ReservationWatch,
    service::availability::AvailabilityService,
};

struct RemoteResult {
    generation: u64,
    dates: Vec<NaiveDate>,
}

/// Live availability for whatever room type the widget has selected.
///
/// Owns the store subscription for its whole lifetime and must be shut down
/// with [`AvailabilitySession::close`]. Feed fetches started for a room type
/// that is no longer selected are discarded when they land.
pub struct AvailabilitySession {
    service: AvailabilityService,
    room: &'static RoomType,
    generation: u64,
    in_flight: Option<Arc<AtomicBool>>,
    remote: Vec<NaiveDate>,
    internal: Vec<NaiveDate>,
    watch: Option<ReservationWatch>,
    results_tx: mpsc::UnboundedSender<RemoteResult>,
    results_rx: mpsc::UnboundedReceiver<RemoteResult>,
}

impl AvailabilitySession {
    pub async fn open(service: AvailabilityService, room: &'static RoomType) -> AppResult<Self> {
        let watch = service.watch().await?;
        let internal = service.project_internal(room).await?;
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            service,
            room,
            generation: 0,
            in_flight: None,
            remote: Vec::new(),
            internal,
            watch: Some(watch),
            results_tx,
            results_rx,
        };
        session.start_remote_fetch();
        Ok(session)
    }

    pub fn room(&self) -> &'static RoomType {
        self.room
    }

    pub fn blocked(&self) -> BlockedDates {
        BlockedDates::merge(&self.remote, &self.internal)
    }

    pub async fn select_room(&mut self, room: &'static RoomType) -> AppResult<BlockedDates> {
        if room.id != self.room.id {
            self.room = room;
            self.remote.clear();
            self.internal = self.service.project_internal(room).await?;
            self.start_remote_fetch();
        }
        Ok(self.blocked())
    }

    fn start_remote_fetch(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;

        let generation = self.generation;
        let cancelled = Arc::new(AtomicBool::new(false));
        self.in_flight = Some(cancelled.clone());

        let service = self.service.clone();
        let room = self.room;
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let dates = service.fetch_remote(room).await;
            if cancelled.load(Ordering::Acquire) {
                tracing::debug!(room = room.id, "Discarding feed result for a deselected room");
                return;
            }
            let _ = results.send(RemoteResult { generation, dates });
        });
    }

    fn cancel_in_flight(&mut self) {
        if let Some(cancelled) = self.in_flight.take() {
            cancelled.store(true, Ordering::Release);
        }
    }

    /// Waits for the next change to the merged set: a store notification or
    /// a finished feed fetch. `None` once the store subscription has ended.
    pub async fn next_update(&mut self) -> AppResult<Option<BlockedDates>> {
        loop {
            let Some(watch) = self.watch.as_mut() else {
                return Ok(None);
            };
            tokio::select! {
                change = watch.changed() => {
                    if change.is_none() {
                        self.watch = None;
                        return Ok(None);
                    }
                    self.internal = self.service.project_internal(self.room).await?;
                    return Ok(Some(self.blocked()));
                }
                Some(result) = self.results_rx.recv() => {
                    if result.generation != self.generation {
                        continue;
                    }
                    self.in_flight = None;
                    self.remote = result.dates;
                    return Ok(Some(self.blocked()));
                }
            }
        }
    }

    pub fn close(mut self) {
        self.cancel_in_flight();
        if let Some(watch) = self.watch.take() {
            watch.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        day::parse_day, reservation::test_support::reservation, room::find_room_type,
    };
    use crate::repository::reservation::ReservationRepository as _;
    use crate::service::fakes::{calendar_config, InMemoryReservations, StaticFeeds};
    use std::time::Duration;
    use tokio::sync::Notify;

    const ROOM2_FEED: &str =
        "BEGIN:VCALENDAR\nBEGIN:VEVENT\nDTSTART:20240702\nEND:VEVENT\nEND:VCALENDAR\n";
    const ROOM3_FEED: &str =
        "BEGIN:VCALENDAR\nBEGIN:VEVENT\nDTSTART:20240909\nEND:VEVENT\nEND:VCALENDAR\n";

    fn day(raw: &str) -> NaiveDate {
        parse_day(raw).unwrap()
    }

    async fn next(session: &mut AvailabilitySession) -> BlockedDates {
        tokio::time::timeout(Duration::from_secs(5), session.next_update())
            .await
            .expect("no update within 5s")
            .unwrap()
            .expect("subscription ended")
    }

    #[tokio::test]
    async fn late_feed_for_previous_room_is_discarded() {
        let gate = Arc::new(Notify::new());
        let feeds = StaticFeeds::default()
            .with_body("room2", ROOM2_FEED)
            .with_body("room3", ROOM3_FEED)
            .gated("room2", gate.clone());
        let store = Arc::new(InMemoryReservations::default());
        let service =
            AvailabilityService::new(store.clone(), Arc::new(feeds), Arc::new(calendar_config()));

        let mut session = AvailabilitySession::open(service, find_room_type("room2").unwrap())
            .await
            .unwrap();
        session
            .select_room(find_room_type("room3").unwrap())
            .await
            .unwrap();
        gate.notify_one();

        let blocked = next(&mut session).await;
        assert!(blocked.is_blocked(day("2024-09-09")));
        assert!(!blocked.is_blocked(day("2024-07-02")));
        assert_eq!(session.room().id, "room3");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!session.blocked().is_blocked(day("2024-07-02")));
        session.close();
    }

    #[tokio::test]
    async fn store_change_reprojects() {
        let store = Arc::new(InMemoryReservations::default());
        let service = AvailabilityService::new(
            store.clone(),
            Arc::new(StaticFeeds::default()),
            Arc::new(calendar_config()),
        );
        let mut session = AvailabilitySession::open(service, find_room_type("room1").unwrap())
            .await
            .unwrap();
        assert!(session.blocked().is_empty());

        store
            .create(crate::service::fakes::create_event(&reservation(
                "2024-12-24",
                "2024-12-26",
                &["room1"],
            )))
            .await
            .unwrap();

        let mut blocked = next(&mut session).await;
        // The (empty) feed result may land first.
        while !blocked.is_blocked(day("2024-12-26")) {
            blocked = next(&mut session).await;
        }
        assert_eq!(blocked.lookup.len(), 3);
        session.close();
        assert_eq!(store.subscriber_count(), 0);
    }
}
