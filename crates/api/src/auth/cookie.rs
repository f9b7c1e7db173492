//! The httpOnly cookie that carries the backend bearer token.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

/// Default cookie name.
const DEFAULT_COOKIE_NAME: &str = "token";
/// Default cookie lifetime in seconds (one day).
const DEFAULT_MAX_AGE_SECS: i64 = 86_400;

/// Configuration of the session cookie.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie name holding the bearer token.
    pub cookie_name: String,
    /// Upper bound on the cookie lifetime in seconds.
    pub max_age_secs: i64,
    /// Add the `Secure` attribute (production over HTTPS).
    pub secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                | Default  |
    /// |------------------------|----------|
    /// | `SESSION_COOKIE_NAME`  | `token`  |
    /// | `SESSION_MAX_AGE_SECS` | `86400`  |
    /// | `COOKIE_SECURE`        | `false`  |
    pub fn from_env() -> Self {
        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.into());

        let max_age_secs: i64 = std::env::var("SESSION_MAX_AGE_SECS")
            .unwrap_or_else(|_| DEFAULT_MAX_AGE_SECS.to_string())
            .parse()
            .expect("SESSION_MAX_AGE_SECS must be a valid i64");

        let secure = std::env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        Self {
            cookie_name,
            max_age_secs,
            secure,
        }
    }

    /// `Set-Cookie` value storing `token` for `max_age_secs`.
    pub fn issue(&self, token: &str, max_age_secs: i64) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name,
            token,
            max_age_secs.max(0)
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }

    /// `Set-Cookie` value that deletes the session cookie.
    pub fn clear(&self) -> HeaderValue {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("token=; Max-Age=0"))
    }

    /// The non-empty session token carried by the request, if any.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        read_cookie(headers, &self.cookie_name)
    }
}

/// Find cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
