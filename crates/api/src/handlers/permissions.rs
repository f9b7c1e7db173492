//! Handler for the permission catalog.

use axum::extract::State;
use axum::response::Response;

use super::forward;
use crate::backend::UpstreamCall;
use crate::error::AppResult;
use crate::middleware::session::SessionToken;
use crate::proxy::Shape;
use crate::state::AppState;

/// GET /api/permissions
///
/// Returns the grouped catalog the role form selects codes from.
pub async fn list(State(state): State<AppState>, session: SessionToken) -> AppResult<Response> {
    let call = UpstreamCall::get("/api/permissions").bearer(session.as_str());
    forward(&state, call, Shape::List).await
}
