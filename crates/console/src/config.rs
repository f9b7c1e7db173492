use std::time::Duration;

use medinv_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Console-side configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Origin serving the `/api` proxy routes, without trailing slash.
    pub base_url: String,
    /// Name of the session cookie forwarded on every call.
    pub session_cookie: String,
    /// Quiet period before a search term is sent (default: `600`).
    pub search_debounce_ms: u64,
    /// Rows per equipment page (default: `10`).
    pub page_size: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            session_cookie: "token".to_string(),
            search_debounce_ms: 600,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                 |
    /// |-----------------------|-------------------------|
    /// | `CONSOLE_BASE_URL`    | `http://localhost:3000` |
    /// | `SESSION_COOKIE_NAME` | `token`                 |
    /// | `SEARCH_DEBOUNCE_MS`  | `600`                   |
    /// | `PAGE_SIZE`           | `10`                    |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable is malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("CONSOLE_BASE_URL").unwrap_or(defaults.base_url);
        let session_cookie =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.session_cookie);

        let search_debounce_ms: u64 = std::env::var("SEARCH_DEBOUNCE_MS")
            .map(|v| v.parse().expect("SEARCH_DEBOUNCE_MS must be a valid u64"))
            .unwrap_or(defaults.search_debounce_ms);

        let page_size: u32 = std::env::var("PAGE_SIZE")
            .map(|v| v.parse().expect("PAGE_SIZE must be a valid u32"))
            .unwrap_or(defaults.page_size);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
            search_debounce_ms,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
