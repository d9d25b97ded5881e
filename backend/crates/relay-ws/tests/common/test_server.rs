#![allow(dead_code)]

use relay_config::CorsConfig;
use relay_ws::{
    AppState, BroadcastHub, ConnectionConfig, ConnectionLimits, DurableLog, Metrics,
    ShutdownCoordinator,
};

use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;
use tempfile::TempDir;

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections_total: usize,
    pub allowed_origins: Vec<String>,
    pub connection: ConnectionConfig,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections_total: 100,
            allowed_origins: Vec::new(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl TestServerConfig {
    /// Only the given origin may open a WebSocket
    pub fn with_allowed_origin(origin: impl Into<String>) -> Self {
        Self {
            allowed_origins: vec![origin.into()],
            ..Default::default()
        }
    }

    /// Ping every `interval_secs` and drop peers silent for `timeout_secs`
    pub fn with_heartbeat(interval_secs: u64, timeout_secs: u64) -> Self {
        Self {
            connection: ConnectionConfig {
                heartbeat_interval_secs: interval_secs,
                heartbeat_timeout_secs: timeout_secs,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create config with strict connection limits (for limit tests)
    pub fn with_strict_limits(max_connections_total: usize) -> Self {
        Self {
            max_connections_total,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub data_dir: TempDir,
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let data_dir = TempDir::new().expect("Failed to create temp dir");
    let (app, app_state) = create_app(config, &data_dir);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        data_dir,
    }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig, data_dir: &TempDir) -> (Router, AppState) {
    let limits = ConnectionLimits {
        max_total: config.max_connections_total,
    };
    let metrics = Metrics::default();
    let hub = BroadcastHub::new(
        DurableLog::empty(data_dir.path().join("data.json")),
        limits,
        metrics.clone(),
    );

    let app_state = AppState {
        hub,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: config.connection,
        cors: CorsConfig {
            allowed_origins: config.allowed_origins,
        },
        max_connections: config.max_connections_total,
    };

    let router = Router::new()
        .route("/ws", get(relay_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
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
