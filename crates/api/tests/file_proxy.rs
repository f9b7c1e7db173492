//! Integration tests for the authenticated file proxy.

mod common;

use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, get, get_with_session, session_token, FakeBackend};

#[tokio::test]
async fn file_proxy_requires_session() {
    let app = common::build_test_app("http://backend.test");

    let response = get(app, "/api/proxy/files?url=http://backend.test/a.png").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_url_is_a_400() {
    let app = common::build_test_app("http://backend.test");

    let response = get_with_session(app, "/api/proxy/files", &session_token(3600)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Falta el parámetro url");
}

#[tokio::test]
async fn non_http_scheme_is_a_400() {
    let app = common::build_test_app("http://backend.test");

    let response = get_with_session(
        app,
        "/api/proxy/files?url=file:///etc/passwd",
        &session_token(3600),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn host_outside_allow_list_is_forbidden() {
    let fake = FakeBackend::new();
    let url = fake.start().await;

    let response = get_with_session(
        common::build_test_app(&url),
        "/api/proxy/files?url=https://evil.example.net/steal.png",
        &session_token(3600),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Origen no permitido");
    assert!(fake.requests().is_empty());
}

/// Files on the backend host are streamed inline and never cached.
#[tokio::test]
async fn backend_file_is_streamed_with_no_store() {
    let fake = FakeBackend::new();
    fake.respond_bytes(Method::GET, "/uploads/qr-7.png", "image/png", b"\x89PNGqr".to_vec());
    let url = fake.start().await;
    let token = session_token(3600);

    let response = get_with_session(
        common::build_test_app(&url),
        &format!("/api/proxy/files?url={url}/uploads/qr-7.png"),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[CONTENT_TYPE], "image/png");
    assert_eq!(headers[CACHE_CONTROL], "no-store");
    assert_eq!(headers[CONTENT_DISPOSITION], "inline");
    assert_eq!(&body_bytes(response).await[..], b"\x89PNGqr");

    let recorded = &fake.requests()[0];
    assert_eq!(recorded.path, "/uploads/qr-7.png");
    assert_eq!(recorded.authorization, Some(format!("Bearer {token}")));
}

#[tokio::test]
async fn missing_file_keeps_upstream_status() {
    let fake = FakeBackend::new();
    let url = fake.start().await;

    let response = get_with_session(
        common::build_test_app(&url),
        &format!("/api/proxy/files?url={url}/uploads/none.png"),
        &session_token(3600),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["message"].is_string());
}
