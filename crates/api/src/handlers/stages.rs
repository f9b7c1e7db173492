//! Handlers for the `/stages` resource.

use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use axum::Json;
use medinv_core::models::{ReorderStages, StageInput};

use super::{forward, with_json};
use crate::backend::UpstreamCall;
use crate::error::{AppError, AppResult};
use crate::extract::{ResourceId, ValidatedJson};
use crate::middleware::session::SessionToken;
use crate::proxy::Shape;
use crate::state::AppState;

/// GET /api/stages
pub async fn list(State(state): State<AppState>, session: SessionToken) -> AppResult<Response> {
    let call = UpstreamCall::get("/api/stages").bearer(session.as_str());
    forward(&state, call, Shape::List).await
}

/// POST /api/stages
pub async fn create(
    State(state): State<AppState>,
    session: SessionToken,
    ValidatedJson(input): ValidatedJson<StageInput>,
) -> AppResult<Response> {
    let call = UpstreamCall::new(Method::POST, "/api/stages").bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// PATCH /api/stages/{id}
pub async fn update(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
    ValidatedJson(input): ValidatedJson<StageInput>,
) -> AppResult<Response> {
    let call = UpstreamCall::new(Method::PATCH, format!("/api/stages/{id}")).bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// DELETE /api/stages/{id}
pub async fn delete(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
) -> AppResult<Response> {
    let call =
        UpstreamCall::new(Method::DELETE, format!("/api/stages/{id}")).bearer(session.as_str());
    forward(&state, call, Shape::Item).await
}

/// PUT /api/stages/reorder
///
/// Persists the full ordering. The payload must number every stage 1..N.
pub async fn reorder(
    State(state): State<AppState>,
    session: SessionToken,
    body: Result<Json<ReorderStages>, axum::extract::rejection::JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = body.map_err(|r| AppError::BadRequest(r.body_text()))?;
    payload.validate_dense()?;
    tracing::info!(stages = payload.stages.len(), "Persisting stage order");

    let call = UpstreamCall::new(Method::PUT, "/api/stages/reorder").bearer(session.as_str());
    forward(&state, with_json(call, &payload)?, Shape::Item).await
}
