use crate::{ConnectionId, ConnectionLimits, Result as WsErrorResult, Subscriber, WsError};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{info, warn};

/// Live subscribers keyed by connection identity.
///
/// Not synchronised on its own: the hub owns it next to the durable log
/// behind a single lock.
pub struct SubscriberRegistry {
    subscribers: HashMap<ConnectionId, Arc<dyn Subscriber>>,
    limits: ConnectionLimits,
}

impl SubscriberRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            subscribers: HashMap::new(),
            limits,
        }
    }

    /// Fail when another subscriber would exceed the configured limit
    #[track_caller]
    pub fn check_capacity(&self) -> WsErrorResult<()> {
        if self.subscribers.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                self.subscribers.len(),
                self.limits.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: self.subscribers.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    pub fn add(&mut self, subscriber: Arc<dyn Subscriber>) {
        let connection_id = subscriber.id();
        self.subscribers.insert(connection_id, subscriber);
        info!(
            "Registered subscriber {connection_id} ({} total)",
            self.subscribers.len()
        );
    }

    /// Remove a subscriber; a no-op when it is already gone
    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<Arc<dyn Subscriber>> {
        let removed = self.subscribers.remove(&connection_id);
        if removed.is_some() {
            info!(
                "Unregistered subscriber {connection_id} ({} total remaining)",
                self.subscribers.len()
            );
        }
        removed
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Arc<dyn Subscriber>),
    {
        self.subscribers.values().for_each(|subscriber| f(subscriber));
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.subscribers.contains_key(&connection_id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
