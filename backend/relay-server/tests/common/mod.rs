#![allow(dead_code)]

//! Test infrastructure for relay-server API tests

use relay_config::CorsConfig;
use relay_ws::{
    AppState, BroadcastHub, ConnectionConfig, ConnectionLimits, DurableLog, Metrics,
    ShutdownCoordinator,
};

use std::path::Path;
use std::time::Duration;

/// Create AppState backed by a history file inside `dir`
pub fn create_test_app_state(dir: &Path) -> AppState {
    create_test_app_state_with_cors(dir, CorsConfig::default())
}

/// Create AppState with a specific origin allow-list
pub fn create_test_app_state_with_cors(dir: &Path, cors: CorsConfig) -> AppState {
    let max_connections = 10000;
    let metrics = Metrics::new();
    let hub = BroadcastHub::new(
        DurableLog::empty(dir.join("data.json")),
        ConnectionLimits {
            max_total: max_connections,
        },
        metrics.clone(),
    );

    AppState {
        hub,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
        cors,
        max_connections,
    }
}

/// Poll until the hub holds `expected` subscribers (or give up after ~2s)
pub async fn wait_for_subscribers(hub: &BroadcastHub, expected: usize) -> bool {
    for _ in 0..100 {
        if hub.subscriber_count().await == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
