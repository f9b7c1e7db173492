//! Handlers for the `/roles` resource.

use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use medinv_core::models::RoleInput;

use super::{forward, with_json};
use crate::backend::UpstreamCall;
use crate::error::AppResult;
use crate::extract::{ResourceId, ValidatedJson};
use crate::middleware::session::SessionToken;
use crate::proxy::Shape;
use crate::state::AppState;

/// GET /api/roles
pub async fn list(State(state): State<AppState>, session: SessionToken) -> AppResult<Response> {
    let call = UpstreamCall::get("/api/roles").bearer(session.as_str());
    forward(&state, call, Shape::List).await
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    session: SessionToken,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> AppResult<Response> {
    let call = UpstreamCall::new(Method::POST, "/api/roles").bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// PATCH /api/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> AppResult<Response> {
    let call = UpstreamCall::new(Method::PATCH, format!("/api/roles/{id}")).bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// DELETE /api/roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
) -> AppResult<Response> {
    let call =
        UpstreamCall::new(Method::DELETE, format!("/api/roles/{id}")).bearer(session.as_str());
    forward(&state, call, Shape::Item).await
}
