//! Cookie-based session extractor for proxy handlers.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Bearer token read from the session cookie.
///
/// Use this as an extractor parameter in every protected proxy handler; a
/// request without the cookie is rejected with `401 {"message":"No autorizado"}`
/// before the handler runs.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .config
            .session
            .read(&parts.headers)
            .map(SessionToken)
            .ok_or(AppError::Unauthorized)
    }
}

/// Clear the session cookie on any 401 answered to a request that carried one.
///
/// The backend is the authority on token validity; once it rejects the token
/// the browser should not keep sending it.
pub async fn expire_on_unauthorized(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let had_session = state.config.session.read(request.headers()).is_some();
    let mut response = next.run(request).await;

    if had_session && response.status() == StatusCode::UNAUTHORIZED {
        tracing::info!("Backend rejected the session token, clearing cookie");
        response
            .headers_mut()
            .append(SET_COOKIE, state.config.session.clear());
    }
    response
}
