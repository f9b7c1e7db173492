pub mod auth;
pub mod categories;
pub mod equipments;
pub mod files;
pub mod permissions;
pub mod roles;
pub mod stages;

use axum::response::Response;

use crate::backend::UpstreamCall;
use crate::error::{AppError, AppResult};
use crate::proxy::{self, Shape};
use crate::state::AppState;

/// Send `call` to the backend and map its response.
pub(crate) async fn forward(state: &AppState, call: UpstreamCall, shape: Shape) -> AppResult<Response> {
    let method = call.method.clone();
    let path = call.path.clone();
    let response = state.backend.send(call).await?;
    tracing::debug!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "Backend responded"
    );
    proxy::relay(response, shape).await
}

/// Attach a JSON body, mapping the (practically impossible) serialization
/// failure to a 500.
pub(crate) fn with_json<T: serde::Serialize>(call: UpstreamCall, body: &T) -> AppResult<UpstreamCall> {
    call.json(body)
        .map_err(|e| AppError::InternalError(format!("Failed to encode request body: {e}")))
}
