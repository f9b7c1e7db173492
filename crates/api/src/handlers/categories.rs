//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use medinv_core::models::CategoryInput;

use super::{forward, with_json};
use crate::backend::UpstreamCall;
use crate::error::AppResult;
use crate::extract::{ResourceId, ValidatedJson};
use crate::middleware::session::SessionToken;
use crate::proxy::Shape;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(State(state): State<AppState>, session: SessionToken) -> AppResult<Response> {
    let call = UpstreamCall::get("/api/categories").bearer(session.as_str());
    forward(&state, call, Shape::List).await
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    session: SessionToken,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> AppResult<Response> {
    let call = UpstreamCall::new(Method::POST, "/api/categories").bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// PATCH /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> AppResult<Response> {
    let call =
        UpstreamCall::new(Method::PATCH, format!("/api/categories/{id}")).bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
) -> AppResult<Response> {
    let call =
        UpstreamCall::new(Method::DELETE, format!("/api/categories/{id}")).bearer(session.as_str());
    forward(&state, call, Shape::Item).await
}
