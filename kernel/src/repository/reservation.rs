use async_trait::async_trait;
use shared::error::AppResult;
use tokio::sync::mpsc;

use crate::model::{
    id::ReservationId,
    reservation::{event::CreateReservation, Reservation},
};

/// A change notification for the reservations collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationChange {
    pub reservation_id: Option<ReservationId>,
}

/// Long-lived subscription to reservation changes. The owner must call
/// `unsubscribe` on teardown; the producing side stops once it notices.
#[derive(Debug)]
pub struct ReservationWatch {
    changes: mpsc::Receiver<ReservationChange>,
}

impl ReservationWatch {
    pub fn channel(buffer: usize) -> (mpsc::Sender<ReservationChange>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { changes: rx })
    }

    /// Waits for the next change. `None` once the store side has gone away.
    pub async fn changed(&mut self) -> Option<ReservationChange> {
        self.changes.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.changes.close();
    }
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // Append a reservation document. Existing documents are never touched.
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // Full scan, normalized; invalid documents are skipped.
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    // Subscribe to appends on the collection.
    async fn watch(&self) -> AppResult<ReservationWatch>;
}
