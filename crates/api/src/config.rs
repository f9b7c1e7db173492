use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::cookie::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except `backend_url` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the inventory backend, without trailing slash.
    pub backend_url: String,
    /// Timeout for a single upstream call in seconds (default: `20`).
    pub upstream_timeout_secs: u64,
    /// Extra hosts the file proxy may fetch from. The backend host is always allowed.
    pub file_proxy_allowed_hosts: Vec<String>,
    /// Largest accepted image upload in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Directory holding the built console pages, if this server serves them.
    pub console_dir: Option<PathBuf>,
    /// Session cookie settings.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `BACKEND_URL`              | **required**               |
    /// | `UPSTREAM_TIMEOUT_SECS`    | `20`                       |
    /// | `FILE_PROXY_ALLOWED_HOSTS` | empty                      |
    /// | `MAX_UPLOAD_BYTES`         | `10485760`                 |
    /// | `CONSOLE_DIR`              | unset                      |
    ///
    /// # Panics
    ///
    /// Panics if `BACKEND_URL` is missing or any numeric variable is malformed.
    pub fn from_env() -> Self {
        let backend_url = std::env::var("BACKEND_URL").expect("BACKEND_URL must be set");
        let backend_url = backend_url.trim().trim_end_matches('/').to_string();
        assert!(!backend_url.is_empty(), "BACKEND_URL must not be empty");

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: split_list(&env_or(
                "CORS_ORIGINS",
                "http://localhost:3000".to_string(),
            )),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            backend_url,
            upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", 20),
            file_proxy_allowed_hosts: split_list(&env_or(
                "FILE_PROXY_ALLOWED_HOSTS",
                String::new(),
            )),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            console_dir: std::env::var("CONSOLE_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            session: SessionConfig::from_env(),
        }
    }
}

/// Parse `name` from the environment, or fall back to `default` when unset.
///
/// Panics on a value that does not parse.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} is malformed ({raw:?}): {e}")),
        Err(_) => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
