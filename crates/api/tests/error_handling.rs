//! Tests for `AppError` → HTTP response mapping.
//!
//! Every variant must render as `{ "message": ... }` with the right status.
//! These call `IntoResponse` directly and need no server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use medinv_api::error::{default_message, AppError};
use medinv_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: missing session maps to 401 "No autorizado"
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_returns_401_with_fixed_message() {
    let (status, json) = error_to_response(AppError::Unauthorized).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, serde_json::json!({ "message": "No autorizado" }));
}

// ---------------------------------------------------------------------------
// Test: upstream errors keep the backend status and message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_error_keeps_status_and_message() {
    let err = AppError::Upstream {
        status: StatusCode::CONFLICT,
        message: "El nombre ya existe".into(),
    };

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "El nombre ya existe");
}

// ---------------------------------------------------------------------------
// Test: CoreError variants map to their HTTP statuses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Stage",
        id: "42".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Stage with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("name: required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "name: required");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("duplicate name".into()));

    let (status, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: internal errors are sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("token signing key leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Error interno del servidor");
}

#[tokio::test]
async fn core_internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("lock poisoned".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Error interno del servidor");
}

// ---------------------------------------------------------------------------
// Test: forbidden and bad request carry their message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forbidden_returns_403() {
    let (status, json) = error_to_response(AppError::Forbidden("Origen no permitido".into())).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Origen no permitido");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("URL inválida".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "URL inválida");
}

// ---------------------------------------------------------------------------
// Test: fallback messages per status class
// ---------------------------------------------------------------------------

#[test]
fn default_messages_cover_common_statuses() {
    assert_eq!(default_message(StatusCode::UNAUTHORIZED), "No autorizado");
    assert_eq!(default_message(StatusCode::NOT_FOUND), "Recurso no encontrado");
    assert_eq!(
        default_message(StatusCode::BAD_GATEWAY),
        "Error interno del servidor"
    );
    assert_eq!(
        default_message(StatusCode::IM_A_TEAPOT),
        "Error en la solicitud"
    );
}

#[tokio::test]
async fn payload_too_large_returns_413() {
    let (status, json) = error_to_response(AppError::PayloadTooLarge).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json, serde_json::json!({ "message": "Archivo demasiado grande" }));
}
