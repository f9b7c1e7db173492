//! Route definitions for the `/stages` resource.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::stages;
use crate::state::AppState;

/// Routes mounted at `/stages`.
///
/// ```text
/// GET, POST       /         -> list, create
/// PUT             /reorder  -> persist full ordering
/// PATCH, DELETE   /{id}     -> update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stages::list).post(stages::create))
        .route("/reorder", put(stages::reorder))
        .route("/{id}", patch(stages::update).delete(stages::delete))
}
