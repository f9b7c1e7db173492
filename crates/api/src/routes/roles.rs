//! Route definitions for the `/roles` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

/// Routes mounted at `/roles`.
///
/// ```text
/// GET, POST       /       -> list, create
/// PATCH, DELETE   /{id}   -> update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roles::list).post(roles::create))
        .route("/{id}", patch(roles::update).delete(roles::delete))
}
