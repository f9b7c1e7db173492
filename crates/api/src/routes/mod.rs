pub mod auth;
pub mod categories;
pub mod equipments;
pub mod health;
pub mod roles;
pub mod stages;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::default_message;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/logout                         logout
/// /auth/session                        session status
///
/// /categories                          list, create
/// /categories/{id}                     update, delete
///
/// /equipments                          search/page, batch create
/// /equipments/{id}                     detail, update, delete
/// /equipments/{id}/qrs                 QR labels
/// /equipments/{id}/image               image upload (multipart)
///
/// /roles                               list, create
/// /roles/{id}                          update, delete
/// /permissions                         permission catalog
///
/// /stages                              list, create
/// /stages/reorder                      persist ordering (PUT)
/// /stages/{id}                         update, delete
///
/// /proxy/files?url=                    authenticated file stream
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/equipments", equipments::router(max_upload_bytes))
        .nest("/roles", roles::router())
        .route("/permissions", get(handlers::permissions::list))
        .nest("/stages", stages::router())
        .route("/proxy/files", get(handlers::files::proxy_file))
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": default_message(StatusCode::NOT_FOUND) })),
    )
}
