use async_trait::async_trait;
use kernel::model::{
    id::ReservationId,
    reservation::{event::CreateReservation, record::normalize_all, Reservation},
};
use kernel::repository::reservation::{
    ReservationChange, ReservationRepository, ReservationWatch,
};
use shared::error::{AppError, AppResult};
use sqlx::{postgres::PgListener, types::Json};
use std::time::Duration;
use tokio::sync::{broadcast, broadcast::error::RecvError, OnceCell};

use crate::database::{model::reservation::ReservationRow, ConnectionPool};

/// Notification channel fed by the `reservations_changed` trigger.
pub const RESERVATIONS_CHANNEL: &str = "reservations_changed";

/// Fan-out of change notifications to every open watch.
#[derive(Clone)]
pub struct ReservationChanges {
    tx: broadcast::Sender<ReservationChange>,
}

impl Default for ReservationChanges {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }
}

impl ReservationChanges {
    pub fn publish(&self, change: ReservationChange) {
        // No receivers is fine.
        let _ = self.tx.send(change);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// The returned watch stops receiving, and its forwarding task exits,
    /// once it is unsubscribed or dropped.
    pub fn subscribe(&self) -> ReservationWatch {
        let mut rx = self.tx.subscribe();
        let (tx, watch) = ReservationWatch::channel(32);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    received = rx.recv() => {
                        let change = match received {
                            Ok(change) => change,
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::debug!(skipped, "Watch lagged, asking for a full re-read");
                                ReservationChange { reservation_id: None }
                            }
                            Err(RecvError::Closed) => break,
                        };
                        if tx.send(change).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        watch
    }
}

pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
    changes: ReservationChanges,
    listening: OnceCell<()>,
}

impl ReservationRepositoryImpl {
    pub fn new(db: ConnectionPool) -> Self {
        Self {
            db,
            changes: ReservationChanges::default(),
            listening: OnceCell::new(),
        }
    }

    /// Starts the single `LISTEN` connection on first use. It stays open for
    /// the life of the repository, however many watches come and go.
    async fn ensure_listening(&self) -> AppResult<()> {
        self.listening
            .get_or_try_init(|| async {
                let mut listener = PgListener::connect_with(self.db.inner_ref())
                    .await
                    .map_err(AppError::SpecificOperationError)?;
                listener
                    .listen(RESERVATIONS_CHANNEL)
                    .await
                    .map_err(AppError::SpecificOperationError)?;
                tokio::spawn(pump_notifications(listener, self.changes.clone()));
                Ok::<_, AppError>(())
            })
            .await
            .map(|_| ())
    }
}

async fn pump_notifications(mut listener: PgListener, changes: ReservationChanges) {
    loop {
        match listener.recv().await {
            Ok(n) => changes.publish(ReservationChange {
                reservation_id: n.payload().parse().ok(),
            }),
            Err(e) => {
                tracing::warn!(error.message = %e, "Reservation listener failed, retrying");
                // Notifications may have been missed while disconnected.
                changes.publish(ReservationChange {
                    reservation_id: None,
                });
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let reservation_id = ReservationId::new();
        let document = serde_json::to_value(&event)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;

        // Append only. No existing document is ever updated or removed.
        let res = sqlx::query(
            r#"
                INSERT INTO reservations (reservation_id, document)
                VALUES ($1, $2)
            "#,
        )
        .bind(reservation_id.raw())
        .bind(Json(document))
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        Ok(event.into_reservation(reservation_id))
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT reservation_id, document
                FROM reservations
                ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let records = rows
            .into_iter()
            .filter_map(ReservationRow::into_record)
            .collect();
        Ok(normalize_all(records))
    }

    async fn watch(&self) -> AppResult<ReservationWatch> {
        self.ensure_listening().await?;
        Ok(self.changes.subscribe())
    }
}
