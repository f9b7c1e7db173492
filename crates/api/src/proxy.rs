//! Mapping of backend responses onto proxy responses.
//!
//! - 2xx: status and body pass through (no body for 204 or an empty body).
//! - 404 on a list endpoint: `200 []`.
//! - Anything else non-OK: same status, `{ "message": ... }` taken from the
//!   upstream JSON (`message` or `error`) or its plain-text body.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{default_message, AppError, AppResult};

/// Longest plain-text upstream body echoed back as a message.
const MAX_TEXT_MESSAGE_LEN: usize = 300;

/// Whether the route returns a collection (and therefore maps 404 to `[]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Item,
    List,
}

/// Convert an upstream response into the proxy's response.
pub async fn relay(response: reqwest::Response, shape: Shape) -> AppResult<Response> {
    let status = response.status();

    if status.is_success() {
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let bytes = response.bytes().await?;
        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(status.into_response());
        }
        let mut out = Response::new(Body::from(bytes));
        *out.status_mut() = status;
        out.headers_mut().insert(
            CONTENT_TYPE,
            content_type.unwrap_or_else(|| HeaderValue::from_static("application/json")),
        );
        return Ok(out);
    }

    if status == StatusCode::NOT_FOUND && shape == Shape::List {
        return Ok((StatusCode::OK, Json(serde_json::json!([]))).into_response());
    }

    Err(upstream_error(response).await)
}

/// Build the [`AppError`] for a non-success upstream response.
pub async fn upstream_error(response: reqwest::Response) -> AppError {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.bytes().await.unwrap_or_default();
    let message = extract_message(status, &body);
    tracing::warn!(status = status.as_u16(), path = %url, message = %message, "Backend returned an error");
    AppError::Upstream { status, message }
}

/// The user-facing message carried by an error body.
pub fn extract_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        return message_from_json(&value).unwrap_or_else(|| default_message(status).to_string());
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || looks_like_markup(text) {
        return default_message(status).to_string();
    }
    text.chars().take(MAX_TEXT_MESSAGE_LEN).collect()
}

fn message_from_json(value: &serde_json::Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| match value.get(*key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    })
}

fn looks_like_markup(text: &str) -> bool {
    text.starts_with('<')
}
