use crate::ApiError;

use relay_ws::WsError;

use std::panic::Location;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_validation_error_when_rendered_then_400_with_field() {
    let error = ApiError::Validation {
        message: "`digits` is required".into(),
        field: Some("digits".into()),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "digits");
}

#[tokio::test]
async fn given_bad_request_when_rendered_then_400_without_field() {
    let error = ApiError::BadRequest {
        message: "invalid request body".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert_eq!(json["error"]["message"], "invalid request body");
    assert!(json["error"].get("field").is_none());
}

#[tokio::test]
async fn given_internal_error_when_rendered_then_500() {
    let error = ApiError::Internal {
        message: "boom".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
}

#[test]
fn given_ws_validation_error_when_converted_then_field_is_kept() {
    let ws_error = WsError::Validation {
        message: "`digits` is required".into(),
        field: Some("digits".into()),
        location: ErrorLocation::from(Location::caller()),
    };

    match ApiError::from(ws_error) {
        ApiError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("digits")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn given_ws_delivery_error_when_converted_then_internal() {
    let ws_error = WsError::ConnectionClosed {
        reason: "gone".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    assert!(matches!(ApiError::from(ws_error), ApiError::Internal { .. }));
}
