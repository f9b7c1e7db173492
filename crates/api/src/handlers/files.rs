//! Authenticated file proxy.
//!
//! Streams a backend-hosted file (equipment photo, QR image) through this
//! origin so the browser never needs the bearer token. Only hosts on the
//! allow-list are fetched.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::Response;
use reqwest::Url;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionToken;
use crate::proxy;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileParams {
    pub url: Option<String>,
}

/// GET /api/proxy/files?url=<absolute url>
pub async fn proxy_file(
    State(state): State<AppState>,
    session: SessionToken,
    Query(params): Query<FileParams>,
) -> AppResult<Response> {
    let raw = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Falta el parámetro url".into()))?;
    let url = parse_source(&raw)?;
    ensure_allowed(&state, &url)?;

    let upstream = state.backend.fetch_file(url.clone(), session.as_str()).await?;
    if !upstream.status().is_success() {
        return Err(proxy::upstream_error(upstream).await);
    }

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    let content_length = upstream.headers().get(CONTENT_LENGTH).cloned();

    tracing::debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "Streaming proxied file");

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    if let Some(length) = content_length {
        headers.insert(CONTENT_LENGTH, length);
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
    Ok(response)
}

fn parse_source(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| AppError::BadRequest("URL inválida".into()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(AppError::BadRequest("URL inválida".into())),
    }
}

fn ensure_allowed(state: &AppState, url: &Url) -> AppResult<()> {
    let host = url
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| AppError::BadRequest("URL inválida".into()))?;

    let allowed = state.backend.host() == Some(host.as_str())
        || state
            .config
            .file_proxy_allowed_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(&host));

    if allowed {
        Ok(())
    } else {
        tracing::warn!(host = %host, "File proxy refused a host outside the allow-list");
        Err(AppError::Forbidden("Origen no permitido".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(parse_source("https://files.example.com/a.png").is_ok());
        assert_matches!(parse_source("file:///etc/passwd"), Err(AppError::BadRequest(_)));
        assert_matches!(parse_source("not a url"), Err(AppError::BadRequest(_)));
    }
}
