//! Record submission and history handlers

use crate::{ApiError, ApiResult, SendRequest};

use relay_core::Record;
use relay_ws::AppState;

use std::panic::Location;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use error_location::ErrorLocation;

/// POST /api/send
pub async fn send_record(
    State(state): State<AppState>,
    body: Result<Json<SendRequest>, JsonRejection>,
) -> ApiResult<Json<Record>> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest {
        message: format!("invalid request body: {}", e.body_text()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let record = state.hub.submit(&req.digits).await?;

    Ok(Json(record))
}

/// GET /api/data
pub async fn list_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.hub.snapshot().await)
}
