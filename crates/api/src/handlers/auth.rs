//! Handlers for the `/auth` resource (login, logout, session status).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::token::{self, TokenStatus};
use crate::backend::UpstreamCall;
use crate::error::{AppError, AppResult};
use crate::proxy;
use crate::state::AppState;

/// Fields the backend may use for the issued token, in lookup order.
const TOKEN_FIELDS: &[&str] = &["token", "accessToken", "access_token"];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response body for `GET /api/auth/session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Forward the credentials, move the issued token into an httpOnly cookie
/// and return the rest of the backend payload (user info) without it.
pub async fn login(State(state): State<AppState>, body: Bytes) -> AppResult<Response> {
    let call = UpstreamCall::new(Method::POST, "/api/auth/login").raw(body);
    let upstream = state.backend.send(call).await?;
    if !upstream.status().is_success() {
        return Err(proxy::upstream_error(upstream).await);
    }

    let mut payload: Value = upstream
        .json()
        .await
        .map_err(|e| AppError::InternalError(format!("Login response is not JSON: {e}")))?;
    let issued = take_token(&mut payload).ok_or_else(|| {
        AppError::InternalError("Login response did not contain a token".into())
    })?;

    let session = &state.config.session;
    let max_age = token::seconds_remaining(&issued, Utc::now())
        .map_or(session.max_age_secs, |remaining| remaining.min(session.max_age_secs));
    let cookie = session
        .issue(&issued, max_age)
        .ok_or_else(|| AppError::InternalError("Token is not a valid cookie value".into()))?;

    tracing::info!(max_age, "Session opened");

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok((StatusCode::OK, headers, Json(payload)).into_response())
}

/// POST /api/auth/logout
///
/// Clear the session cookie. Always succeeds.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, state.config.session.clear());
    tracing::info!("Session closed");
    (
        StatusCode::OK,
        headers,
        Json(json!({ "message": "Sesión cerrada" })),
    )
        .into_response()
}

/// GET /api/auth/session
///
/// Report whether the cookie holds a non-expired token.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionStatus> {
    let status = state
        .config
        .session
        .read(&headers)
        .map(|t| token::inspect(&t, Utc::now()));

    Json(match status {
        Some(TokenStatus::Active { expires_at }) => SessionStatus {
            authenticated: true,
            expires_at,
        },
        _ => SessionStatus {
            authenticated: false,
            expires_at: None,
        },
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Remove and return the token from the login payload, looking at the top
/// level first and then inside a `data` envelope.
fn take_token(payload: &mut Value) -> Option<String> {
    fn take_from(obj: &mut serde_json::Map<String, Value>) -> Option<String> {
        TOKEN_FIELDS.iter().find_map(|field| match obj.remove(*field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        })
    }

    let obj = payload.as_object_mut()?;
    if let Some(found) = take_from(obj) {
        return Some(found);
    }
    obj.get_mut("data")
        .and_then(Value::as_object_mut)
        .and_then(take_from)
}
