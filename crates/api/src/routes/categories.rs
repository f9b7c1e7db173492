//! Route definitions for the `/categories` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET, POST       /       -> list, create
/// PATCH, DELETE   /{id}   -> update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route("/{id}", patch(categories::update).delete(categories::delete))
}
