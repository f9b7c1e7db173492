//! Route definitions for the `/equipments` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::equipments;
use crate::state::AppState;

/// Routes mounted at `/equipments`.
///
/// ```text
/// GET, POST               /            -> search/page, batch create
/// GET, PATCH, DELETE      /{id}        -> detail, update, delete
/// GET                     /{id}/qrs    -> QR labels
/// POST                    /{id}/image  -> multipart image upload
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(equipments::list).post(equipments::create_batch))
        .route(
            "/{id}",
            get(equipments::get)
                .patch(equipments::update)
                .delete(equipments::delete),
        )
        .route("/{id}/qrs", get(equipments::list_qrs))
        .route(
            "/{id}/image",
            post(equipments::upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
