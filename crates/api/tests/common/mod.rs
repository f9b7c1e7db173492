#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tower::ServiceExt;

use medinv_api::auth::cookie::SessionConfig;
use medinv_api::config::ServerConfig;
use medinv_api::router::build_app_router;
use medinv_api::state::AppState;

pub const COOKIE_NAME: &str = "token";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointing at `backend_url`.
pub fn test_config(backend_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        backend_url: backend_url.trim_end_matches('/').to_string(),
        upstream_timeout_secs: 5,
        file_proxy_allowed_hosts: vec!["cdn.example.com".to_string()],
        max_upload_bytes: 1024 * 1024,
        console_dir: None,
        session: SessionConfig {
            cookie_name: COOKIE_NAME.to_string(),
            max_age_secs: 3600,
            secure: false,
        },
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(backend_url: &str) -> Router {
    build_test_app_with(test_config(backend_url))
}

/// Build the application router from a customised config.
pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState::new(config).expect("client should build");
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

/// A request received by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("recorded body should be JSON")
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
}

#[derive(Default)]
struct FakeInner {
    responses: HashMap<(Method, String), Canned>,
    requests: Vec<Recorded>,
}

/// In-process stand-in for the inventory backend.
///
/// Responses are scripted per `(method, path)`; every request is recorded.
/// Unscripted routes answer `404 {"message":"Cannot <METHOD> <path>"}`.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(&self, method: Method, path: &str, status: StatusCode, body: serde_json::Value) {
        self.script(method, path, status, "application/json", body.to_string().into_bytes());
    }

    pub fn respond_text(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.script(method, path, status, "text/plain", body.as_bytes().to_vec());
    }

    pub fn respond_bytes(
        &self,
        method: Method,
        path: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) {
        self.script(method, path, StatusCode::OK, content_type, body);
    }

    pub fn respond_empty(&self, method: Method, path: &str, status: StatusCode) {
        self.script(method, path, status, "application/json", Vec::new());
    }

    fn script(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        content_type: &'static str,
        body: Vec<u8>,
    ) {
        self.inner.lock().unwrap().responses.insert(
            (method, path.to_string()),
            Canned {
                status,
                content_type,
                body,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn handle(
    State(fake): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    let mut inner = fake.inner.lock().unwrap();
    inner.requests.push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        body,
    });

    match inner.responses.get(&(method.clone(), uri.path().to_string())) {
        Some(canned) => (
            canned.status,
            [(CONTENT_TYPE, canned.content_type)],
            canned.body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({
                "message": format!("Cannot {method} {}", uri.path())
            })),
        )
            .into_response(),
    }
}

/// A base URL where nothing is listening.
pub async fn unreachable_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Session tokens
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: i64,
}

/// A backend-style JWT expiring `offset_secs` from now (negative = expired).
pub fn session_token(offset_secs: i64) -> String {
    let claims = TestClaims {
        sub: "user-1".to_string(),
        exp: chrono::Utc::now().timestamp() + offset_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

pub fn cookie_header(token: &str) -> String {
    format!("{COOKIE_NAME}={token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_session(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie_header(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(COOKIE, cookie_header(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(COOKIE, cookie_header(token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// All `Set-Cookie` values on a response.
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(String::from))
        .collect()
}
