use metrics::{counter, gauge};

/// Metrics collector for hub and WebSocket operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "relay_ws" }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    pub fn record_accepted(&self) {
        counter!(format!("{}.records.accepted", self.prefix)).increment(1);
    }

    pub fn record_rejected(&self) {
        counter!(format!("{}.records.rejected", self.prefix)).increment(1);
    }

    pub fn record_delivered(&self) {
        counter!(format!("{}.broadcast.delivered", self.prefix)).increment(1);
    }

    pub fn records_replayed(&self, count: usize) {
        counter!(format!("{}.replay.records", self.prefix)).increment(count as u64);
    }

    pub fn delivery_failed(&self) {
        counter!(format!("{}.errors.delivery", self.prefix)).increment(1);
    }

    pub fn persist_failed(&self) {
        counter!(format!("{}.errors.persist", self.prefix)).increment(1);
    }

    pub fn subscribers(&self, count: usize) {
        gauge!(format!("{}.broadcast.subscribers", self.prefix)).set(count as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
