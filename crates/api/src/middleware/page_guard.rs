//! Routing guard for console pages.
//!
//! Page requests without a live session are redirected to `/login` (and an
//! expired cookie is cleared on the way). A live session visiting `/login`
//! is sent to the dashboard instead.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;

use crate::auth::token::{self, TokenStatus};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Path prefixes served without a session (static assets).
const PUBLIC_PREFIXES: &[&str] = &["/assets/", "/static/", "/favicon"];

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub async fn page_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_public(&path) {
        return next.run(request).await;
    }

    let session = &state.config.session;
    let status = session
        .read(request.headers())
        .map(|t| token::inspect(&t, Utc::now()));
    let is_login = path == LOGIN_PATH || path.starts_with("/login/");

    match status {
        Some(TokenStatus::Active { .. }) if is_login => Redirect::to(HOME_PATH).into_response(),
        Some(TokenStatus::Active { .. }) => next.run(request).await,
        _ if is_login => next.run(request).await,
        Some(stale) => {
            tracing::debug!(path = %path, status = ?stale, "Stale session, redirecting to login");
            let mut response = Redirect::to(LOGIN_PATH).into_response();
            response.headers_mut().append(SET_COOKIE, session.clear());
            response
        }
        None => {
            tracing::debug!(path = %path, "No session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
