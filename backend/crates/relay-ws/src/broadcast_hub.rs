use crate::{
    ConnectionId, ConnectionLimits, DurableLog, LoadStatus, Metrics, Result as WsErrorResult,
    Subscriber, SubscriberRegistry, WsError,
};

use relay_core::Record;

use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

use error_location::ErrorLocation;
use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::Mutex;

/// Single-topic broadcast hub.
///
/// The durable log and the subscriber registry live behind one lock. Every
/// append, fan-out, replay, registration and removal happens while holding
/// it, so a subscriber sees each record exactly once: either in its replay
/// or through live fan-out, never both and never neither. Sends are awaited
/// under the lock; transports must bound how long a send can take.
#[derive(Clone)]
pub struct BroadcastHub {
    inner: Arc<Mutex<HubState>>,
    metrics: Metrics,
}

struct HubState {
    log: DurableLog,
    registry: SubscriberRegistry,
}

impl BroadcastHub {
    pub fn new(log: DurableLog, limits: ConnectionLimits, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                log,
                registry: SubscriberRegistry::new(limits),
            })),
            metrics,
        }
    }

    /// Load history from `path` and build a hub around it.
    ///
    /// A missing or corrupt file starts the hub with empty history; a corrupt
    /// file is left untouched until the next successful append.
    pub async fn open(path: impl Into<PathBuf>, limits: ConnectionLimits, metrics: Metrics) -> Self {
        let (log, status) = DurableLog::load(path).await;

        match status {
            LoadStatus::Loaded { count } => {
                info!("Loaded {count} records from {}", log.path().display());
            }
            LoadStatus::NoHistory => {
                info!(
                    "History file {} not found; starting with empty history",
                    log.path().display()
                );
            }
            LoadStatus::Corrupt(e) => {
                error!("{e}; starting with empty history");
            }
        }

        Self::new(log, limits, metrics)
    }

    /// Accept a raw submission, persist it and push it to every subscriber.
    ///
    /// Only validation fails the call. Persist and delivery failures are
    /// logged; failing subscribers are dropped and closed.
    pub async fn submit(&self, raw: &str) -> WsErrorResult<Record> {
        let record = Record::accept(raw).map_err(|e| {
            self.metrics.record_rejected();
            WsError::from(e)
        })?;

        let mut state = self.inner.lock().await;

        if let Err(e) = state.log.append(record.clone()).await {
            error!("{e}");
            self.metrics.persist_failed();
        }
        self.metrics.record_accepted();

        let record_ref = &record;
        let mut sends = Vec::with_capacity(state.registry.len());
        state.registry.for_each(|subscriber| {
            let subscriber = Arc::clone(subscriber);
            sends.push(async move {
                let result = subscriber.send(record_ref).await;
                (subscriber.id(), result)
            });
        });
        let outcomes = join_all(sends).await;

        let attempted = outcomes.len();
        let mut failed = Vec::new();
        for (connection_id, result) in outcomes {
            match result {
                Ok(()) => self.metrics.record_delivered(),
                Err(e) => {
                    warn!("Broadcast to {connection_id} failed, removing subscriber: {e}");
                    self.metrics.delivery_failed();
                    failed.push(connection_id);
                }
            }
        }

        for connection_id in failed.iter().copied() {
            if let Some(subscriber) = state.registry.remove(connection_id) {
                subscriber.close();
            }
        }

        info!(
            "Stored and broadcast record '{}' ({}/{} delivered)",
            record.payload,
            attempted - failed.len(),
            attempted
        );
        self.metrics.subscribers(state.registry.len());

        Ok(record)
    }

    /// Replay the full history to `subscriber`, then register it.
    ///
    /// On any replay failure the subscriber is closed and not registered.
    pub async fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> WsErrorResult<()> {
        let connection_id = subscriber.id();
        let mut state = self.inner.lock().await;

        if let Err(e) = state.registry.check_capacity() {
            subscriber.close();
            return Err(e);
        }

        for record in state.log.records() {
            if let Err(e) = subscriber.send(record).await {
                self.metrics.delivery_failed();
                subscriber.close();
                return Err(WsError::Delivery {
                    connection_id,
                    reason: format!("history replay failed: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        let replayed = state.log.len();
        self.metrics.records_replayed(replayed);
        state.registry.add(subscriber);
        self.metrics.subscribers(state.registry.len());
        debug!("Replayed {replayed} records to {connection_id}");

        Ok(())
    }

    /// Deregister a subscriber. Returns false when it was already removed.
    pub async fn unsubscribe(&self, connection_id: ConnectionId) -> bool {
        let mut state = self.inner.lock().await;
        let removed = state.registry.remove(connection_id).is_some();
        self.metrics.subscribers(state.registry.len());
        removed
    }

    /// Copy of the full history in acceptance order
    pub async fn snapshot(&self) -> Vec<Record> {
        let state = self.inner.lock().await;
        state.log.records().to_vec()
    }

    pub async fn subscriber_count(&self) -> usize {
        let state = self.inner.lock().await;
        state.registry.len()
    }

    pub async fn record_count(&self) -> usize {
        let state = self.inner.lock().await;
        state.log.len()
    }

    pub async fn is_subscribed(&self, connection_id: ConnectionId) -> bool {
        let state = self.inner.lock().await;
        state.registry.contains(connection_id)
    }
}
