use relay_server::{build_router, logger};

use relay_ws::{
    AppState, BroadcastHub, ConnectionConfig, ConnectionLimits, Metrics, ShutdownCoordinator,
};

use std::error::Error;

use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = relay_config::Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(log_dir) = log_file_path.as_deref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(log_dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting relay-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    // Load history before accepting any connection
    let hub = BroadcastHub::open(
        config.storage_path()?,
        ConnectionLimits {
            max_total: config.server.max_connections,
        },
        metrics.clone(),
    )
    .await;

    let connection_config = ConnectionConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        send_timeout_secs: config.websocket.send_timeout_secs,
        heartbeat_interval_secs: config.websocket.heartbeat_interval_secs,
        heartbeat_timeout_secs: config.websocket.heartbeat_timeout_secs,
    };

    let app_state = AppState {
        hub,
        metrics,
        shutdown: shutdown.clone(),
        config: connection_config,
        cors: config.cors.clone(),
        max_connections: config.server.max_connections,
    };

    let app = build_router(app_state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Subscribe before serving so an early signal is not missed
    let mut shutdown_guard = shutdown.subscribe_guard();

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_guard.wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}
