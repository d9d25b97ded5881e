use crate::{
    BroadcastHub, ConnectionConfig, ConnectionId, Metrics, ShutdownCoordinator,
    WebSocketConnection, WsError,
};

use relay_config::CorsConfig;

use std::panic::Location;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::ORIGIN},
    response::Response,
};
use error_location::ErrorLocation;
use log::{debug, error, warn};

/// Shared application state for WebSocket and HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: BroadcastHub,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
    pub cors: CorsConfig,
    pub max_connections: usize,
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let origin = headers.get(ORIGIN).and_then(|h| h.to_str().ok());
    if !state.cors.is_allowed(origin) {
        let e = WsError::Handshake {
            reason: format!("origin not allowed: {}", origin.unwrap_or("<none>")),
            location: ErrorLocation::from(Location::caller()),
        };
        warn!("{e}");
        return Err(StatusCode::FORBIDDEN);
    }

    // Early rejection; the hub re-checks under its lock
    let current = state.hub.subscriber_count().await;
    if current >= state.max_connections {
        warn!(
            "Rejecting WebSocket upgrade: {current}/{} connections",
            state.max_connections
        );
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let connection_id = ConnectionId::new();
    debug!("WebSocket upgrade request for connection {connection_id}");

    Ok(ws
        .on_failed_upgrade(move |e: axum::Error| {
            let e = WsError::Handshake {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
            warn!("Connection {connection_id}: {e}");
        })
        .on_upgrade(move |socket| handle_socket(socket, connection_id, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, state: AppState) {
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        connection_id,
        state.config,
        state.metrics.clone(),
        state.hub.clone(),
    );

    if let Err(e) = connection.handle(socket, shutdown_guard).await {
        error!("Connection {connection_id} error: {e}");
    }
}
