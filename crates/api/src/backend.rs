//! HTTP client for the inventory backend.
//!
//! Wraps a pooled [`reqwest::Client`] and attaches the caller's bearer token
//! to every request. Responses are returned untouched; status mapping lives
//! in [`crate::proxy`].

use std::time::Duration;

use axum::http::header::AUTHORIZATION;
use axum::http::Method;
use reqwest::multipart::Form;
use reqwest::Url;

/// HTTP client bound to one backend base URL.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    host: Option<String>,
}

/// Body attached to an upstream call.
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Raw(axum::body::Bytes),
    Multipart(Form),
}

/// A request to forward to `${BACKEND_URL}{path}`.
pub struct UpstreamCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: Payload,
}

impl UpstreamCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            bearer: None,
            body: Payload::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Raw query string (without `?`), forwarded verbatim when non-empty.
    pub fn query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json<T: serde::Serialize>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Payload::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn raw(mut self, body: axum::body::Bytes) -> Self {
        self.body = Payload::Raw(body);
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Payload::Multipart(form);
        self
    }
}

impl BackendClient {
    /// Build a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let host = Url::parse(&base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));
        Ok(Self {
            client,
            base_url,
            host,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host of the backend URL, always trusted by the file proxy.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Absolute URL for a backend path such as `/api/categories`.
    pub fn endpoint(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.base_url, path, q),
            None => format!("{}{}", self.base_url, path),
        }
    }

    /// Send `call` and return the raw upstream response.
    pub async fn send(&self, call: UpstreamCall) -> Result<reqwest::Response, reqwest::Error> {
        let url = self.endpoint(&call.path, call.query.as_deref());
        let mut request = self.client.request(call.method, url);
        if let Some(token) = &call.bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request = match call.body {
            Payload::Empty => request,
            Payload::Json(value) => request.json(&value),
            Payload::Raw(bytes) => request
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(bytes),
            Payload::Multipart(form) => request.multipart(form),
        };
        request.send().await
    }

    /// Fetch an absolute file URL with the caller's bearer token.
    pub async fn fetch_file(&self, url: Url, token: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
    }
}
