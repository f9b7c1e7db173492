//! Handlers for the `/equipments` resource.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use medinv_core::models::{CreateEquipmentBatch, EquipmentUpdate};
use medinv_core::upload::ImageFile;
use reqwest::multipart::{Form, Part};

use super::{forward, with_json};
use crate::backend::UpstreamCall;
use crate::error::{AppError, AppResult};
use crate::extract::{ResourceId, ValidatedJson};
use crate::middleware::session::SessionToken;
use crate::proxy::Shape;
use crate::state::AppState;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// GET /api/equipments?page=&limit=&search=
///
/// The query string is forwarded verbatim so the backend owns paging rules.
pub async fn list(
    State(state): State<AppState>,
    session: SessionToken,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let call = UpstreamCall::get("/api/equipments")
        .query(query)
        .bearer(session.as_str());
    forward(&state, call, Shape::List).await
}

/// POST /api/equipments
///
/// Creates `quantity` records in one backend call.
pub async fn create_batch(
    State(state): State<AppState>,
    session: SessionToken,
    ValidatedJson(input): ValidatedJson<CreateEquipmentBatch>,
) -> AppResult<Response> {
    tracing::info!(quantity = input.quantity, name = %input.name, "Creating equipment batch");
    let call = UpstreamCall::new(Method::POST, "/api/equipments").bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// GET /api/equipments/{id}
pub async fn get(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
) -> AppResult<Response> {
    let call = UpstreamCall::get(format!("/api/equipments/{id}")).bearer(session.as_str());
    forward(&state, call, Shape::Item).await
}

/// PATCH /api/equipments/{id}
pub async fn update(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
    ValidatedJson(input): ValidatedJson<EquipmentUpdate>,
) -> AppResult<Response> {
    let call =
        UpstreamCall::new(Method::PATCH, format!("/api/equipments/{id}")).bearer(session.as_str());
    forward(&state, with_json(call, &input)?, Shape::Item).await
}

/// DELETE /api/equipments/{id}
pub async fn delete(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
) -> AppResult<Response> {
    let call =
        UpstreamCall::new(Method::DELETE, format!("/api/equipments/{id}")).bearer(session.as_str());
    forward(&state, call, Shape::Item).await
}

/// GET /api/equipments/{id}/qrs
pub async fn list_qrs(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
) -> AppResult<Response> {
    let call = UpstreamCall::get(format!("/api/equipments/{id}/qrs")).bearer(session.as_str());
    forward(&state, call, Shape::List).await
}

/// POST /api/equipments/{id}/image
///
/// Accepts a multipart form with an `image` field and re-sends it upstream.
pub async fn upload_image(
    State(state): State<AppState>,
    session: SessionToken,
    ResourceId(id): ResourceId,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut image: Option<ImageFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        image = Some(ImageFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let image = image.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{IMAGE_FIELD}'"))
    })?;
    image.validate()?;

    tracing::info!(
        equipment_id = %id,
        file_name = %image.file_name,
        size = image.bytes.len(),
        "Forwarding equipment image"
    );

    let part = Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)
        .map_err(|e| AppError::BadRequest(format!("Invalid content type: {e}")))?;
    let form = Form::new().part(IMAGE_FIELD, part);

    let call = UpstreamCall::new(Method::POST, format!("/api/equipments/{id}/image"))
        .bearer(session.as_str())
        .multipart(form);
    forward(&state, call, Shape::Item).await
}

/// A body over the upload limit surfaces as 413; any other multipart
/// failure is a 400.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %err, "Image upload over the size limit");
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(err.body_text())
    }
}
