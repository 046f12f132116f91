//! Shared test harness: in-memory SQLite pool, tempdir upload directory,
//! and request helpers driving the real router via `oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

use filedepot_api::config::ApiConfig;
use filedepot_api::{AppState, migrate};

pub struct TestApp {
    pub router: Router,
    pub pool: sqlx::SqlitePool,
    pub upload_dir: TempDir,
}

pub async fn test_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    migrate(&pool).await.expect("migrate");

    let upload_dir = tempfile::tempdir().expect("tempdir");

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "sqlite::memory:".into(),
        access_secret: "test-access-secret".into(),
        refresh_secret: "test-refresh-secret".into(),
        access_ttl_secs: 900,
        refresh_ttl_secs: 3600,
        upload_dir: upload_dir.path().to_path_buf(),
        max_file_size: 1024 * 1024,
    };

    TestApp {
        router: filedepot_api::router(AppState::new(pool.clone(), config)),
        pool,
        upload_dir,
    }
}

/// Send a request, returning status and raw body.
pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, headers, body)
}

/// Send a request, returning status and parsed JSON body.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send_raw(app, req).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|_| panic!("non-JSON body: {:?}", String::from_utf8_lossy(&body)));
    (status, json)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Sign up a user, returning (access_token, refresh_token).
pub async fn signup(app: &Router, id: &str, password: &str) -> (String, String) {
    let (status, json) = send(
        app,
        json_request("POST", "/signup", serde_json::json!({"id": id, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {json}");
    (
        json["accessToken"].as_str().unwrap().to_string(),
        json["refreshToken"].as_str().unwrap().to_string(),
    )
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Build a single-field (`file`) multipart request.
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Multipart request with no `file` field.
pub fn multipart_request_without_file(method: &str, uri: &str, token: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
