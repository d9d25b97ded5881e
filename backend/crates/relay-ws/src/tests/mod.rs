
use crate::{
    BroadcastHub, ConnectionId, ConnectionLimits, DurableLog, Metrics, Result as WsErrorResult,
    Subscriber, WsError,
};

use relay_core::Record;

use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use error_location::ErrorLocation;

/// In-memory subscriber that records everything it is sent.
/// `fail_after` makes every send past that many successes fail.
pub(crate) struct RecordingSubscriber {
    id: ConnectionId,
    received: Mutex<Vec<Record>>,
    fail_after: Option<usize>,
    sends: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingSubscriber {
    pub(crate) fn healthy() -> Arc<Self> {
        Arc::new(Self::with_fail_after(None))
    }

    pub(crate) fn broken() -> Arc<Self> {
        Arc::new(Self::with_fail_after(Some(0)))
    }

    pub(crate) fn failing_after(successes: usize) -> Arc<Self> {
        Arc::new(Self::with_fail_after(Some(successes)))
    }

    fn with_fail_after(fail_after: Option<usize>) -> Self {
        Self {
            id: ConnectionId::new(),
            received: Mutex::new(Vec::new()),
            fail_after,
            sends: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn received(&self) -> Vec<Record> {
        self.received.lock().unwrap().clone()
    }

    pub(crate) fn payloads(&self) -> Vec<String> {
        self.received().into_iter().map(|r| r.payload).collect()
    }

    pub(crate) fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, record: &Record) -> WsErrorResult<()> {
        let attempt = self.sends.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after
            && attempt >= limit
        {
            return Err(WsError::ConnectionClosed {
                reason: "peer went away".into(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.received.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub(crate) fn hub_at(path: &Path) -> BroadcastHub {
    BroadcastHub::new(
        DurableLog::empty(path),
        ConnectionLimits::default(),
        Metrics::new(),
    )
}

pub(crate) fn hub_with_limit(path: &Path, max_total: usize) -> BroadcastHub {
    BroadcastHub::new(
        DurableLog::empty(path),
        ConnectionLimits { max_total },
        Metrics::new(),
    )
}
