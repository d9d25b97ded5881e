use crate::{cors, health, list_records, send_record};

use relay_ws::AppState;

use axum::{
    Router,
    routing::{get, post},
};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let cors = cors::cors_layer(&state.cors);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(relay_ws::handler))
        // Record endpoints
        .route("/api/send", post(send_record))
        .route("/api/data", get(list_records))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .layer(cors)
}
