use async_trait::async_trait;
use serde_json::Value;
use shared::{
    config::CalendarConfig,
    error::{AppError, AppResult},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::{mpsc, Notify};

use crate::{
    model::{
        id::ReservationId,
        reservation::{event::CreateReservation, Reservation},
    },
    repository::{
        calendar_feed::CalendarFeedRepository,
        channel::ChannelRepository,
        reservation::{ReservationChange, ReservationRepository, ReservationWatch},
    },
};

pub fn feed_url(slug: &str) -> String {
    format!("https://feeds.test/{slug}.ics")
}

/// room2..room4 have external feeds; room1, room5 and room6 don't.
pub fn calendar_config() -> CalendarConfig {
    CalendarConfig {
        feeds: ["room2", "room3", "room4"]
            .iter()
            .map(|slug| (slug.to_string(), feed_url(slug)))
            .collect(),
        fetch_timeout: Duration::from_secs(1),
        ..Default::default()
    }
}

pub fn create_event(r: &Reservation) -> CreateReservation {
    CreateReservation::new(
        r.check_in,
        r.check_out,
        r.adults,
        r.children,
        r.rooms,
        r.selected_rooms.clone(),
        r.guest.clone(),
        chrono::Utc::now(),
        0,
    )
}

#[derive(Default)]
pub struct InMemoryReservations {
    docs: Mutex<Vec<Reservation>>,
    subscribers: Mutex<Vec<mpsc::Sender<ReservationChange>>>,
}

impl InMemoryReservations {
    pub fn with(docs: Vec<Reservation>) -> Self {
        Self {
            docs: Mutex::new(docs),
            ..Default::default()
        }
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservations {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let id = ReservationId::new();
        let reservation = event.into_reservation(id);
        self.docs.lock().unwrap().push(reservation.clone());

        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        for tx in subscribers.iter() {
            let _ = tx.try_send(ReservationChange {
                reservation_id: Some(id),
            });
        }
        Ok(reservation)
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        Ok(self.docs.lock().unwrap().clone())
    }

    async fn watch(&self) -> AppResult<ReservationWatch> {
        let (tx, watch) = ReservationWatch::channel(16);
        self.subscribers.lock().unwrap().push(tx);
        Ok(watch)
    }
}

#[derive(Default)]
pub struct StaticFeeds {
    bodies: HashMap<String, String>,
    gates: HashMap<String, Arc<Notify>>,
}

impl StaticFeeds {
    pub fn with_body(mut self, slug: &str, body: &str) -> Self {
        self.bodies.insert(feed_url(slug), body.to_string());
        self
    }

    /// Holds fetches for `slug` until the gate is notified.
    pub fn gated(mut self, slug: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(feed_url(slug), gate);
        self
    }
}

#[async_trait]
impl CalendarFeedRepository for StaticFeeds {
    async fn fetch_feed(&self, url: &str) -> AppResult<String> {
        if let Some(gate) = self.gates.get(url) {
            gate.notified().await;
        }
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::ExternalServiceError(format!("{url} answered 503")))
    }
}

pub enum ChannelMode {
    Accept,
    NotConfigured,
    Fail,
}

pub struct RecordingChannel {
    mode: ChannelMode,
    sent: Mutex<Vec<Value>>,
}

impl RecordingChannel {
    pub fn new(mode: ChannelMode) -> Self {
        Self {
            mode,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelRepository for RecordingChannel {
    async fn forward_block(&self, reservation: Value) -> AppResult<()> {
        match self.mode {
            ChannelMode::NotConfigured => Err(AppError::NotConfigured("no block webhook".into())),
            ChannelMode::Accept => {
                self.sent.lock().unwrap().push(reservation);
                Ok(())
            }
            ChannelMode::Fail => {
                self.sent.lock().unwrap().push(reservation);
                Err(AppError::ExternalServiceError("webhook answered 500".into()))
            }
        }
    }
}
