//! HTTP API integration tests
//! Drives the login/session endpoints over a real socket
//!
//! Run with: cargo test --test api_tests

use authlab::api::{serve, start_session_sweeper, AppState, SharedState};
use authlab::config::Config;
use chrono::{Duration, Utc};
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct TestServer {
    addr: SocketAddr,
    state: SharedState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the API on an ephemeral port with the default student account
async fn start_test_server() -> TestServer {
    start_test_server_with(None).await
}

async fn start_test_server_with(static_dir: Option<PathBuf>) -> TestServer {
    let mut config = Config::default();
    config.bcrypt_cost = 4;

    let state = Arc::new(AppState::from_config(&config).expect("Failed to build state"));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let server_state = state.clone();
    let handle = tokio::spawn(async move {
        let _ = serve(listener, server_state, static_dir.as_deref()).await;
    });

    TestServer { addr, state, handle }
}

async fn login(server: &TestServer, username: &str, password: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(server.url("/api/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login request failed")
}

/// `name=value` part of the Set-Cookie header
fn cookie_pair(response: &reqwest::Response) -> String {
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("Missing Set-Cookie")
        .to_str()
        .expect("Set-Cookie not ASCII");
    set_cookie.split(';').next().unwrap().trim().to_string()
}

async fn me(server: &TestServer, cookie: Option<&str>) -> (StatusCode, Value) {
    let mut request = reqwest::Client::new().get(server.url("/api/me"));
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    let response = request.send().await.expect("/api/me request failed");
    let status = response.status();
    let body = response.json::<Value>().await.expect("/api/me body not JSON");
    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = start_test_server().await;
    let response = reqwest::get(server.url("/api/health")).await.unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_login_then_whoami() {
    let server = start_test_server().await;

    let response = login(&server, "student", "password123").await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=1800"));

    let cookie = cookie_pair(&response);
    let token = cookie.strip_prefix("session=").expect("cookie should be named session");
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = me(&server, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "authenticated": true, "username": "student" }));
}

#[tokio::test]
async fn test_failed_logins_are_indistinguishable() {
    let server = start_test_server().await;

    let wrong_password = login(&server, "student", "wrong").await;
    let unknown_user = login(&server, "nobody", "password123").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(SET_COOKIE).is_none());
    assert!(unknown_user.headers().get(SET_COOKIE).is_none());

    let a = wrong_password.text().await.unwrap();
    let b = unknown_user.text().await.unwrap();
    assert_eq!(a, b);

    let body: Value = serde_json::from_str(&a).unwrap();
    assert_eq!(body, json!({ "success": false, "message": "Invalid credentials" }));
    assert!(server.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_form_encoded_login() {
    let server = start_test_server().await;

    let response = reqwest::Client::new()
        .post(server.url("/api/login"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("username=student&password=password123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cookie_pair(&response);
    let (status, _) = me(&server, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_login_body() {
    let server = start_test_server().await;
    let client = reqwest::Client::new();

    let bodies = [
        ("application/json", "{not json"),
        ("application/json", r#"{"username":"student"}"#),
        ("application/json", r#"{"username":1,"password":2}"#),
        ("text/plain", "student:password123"),
    ];

    for (content_type, body) in bodies {
        let response = client
            .post(server.url("/api/login"))
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "success": false, "message": "Invalid request" }));
    }
}

#[tokio::test]
async fn test_whoami_unauthenticated_variants() {
    let server = start_test_server().await;
    let expected = json!({ "authenticated": false });

    let (status, body) = me(&server, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let (status, body) = me(&server, Some("session=garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let (status, body) = me(&server, Some("session=")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let expired = server
        .state
        .sessions
        .create_at(1, Utc::now() - Duration::minutes(31))
        .await;
    let (status, body) = me(&server, Some(&format!("session={}", expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    // Expired entry removed on access
    assert!(server.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let server = start_test_server().await;
    let client = reqwest::Client::new();

    let response = login(&server, "student", "password123").await;
    let cookie = cookie_pair(&response);

    let response = client
        .post(server.url("/api/logout"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cleared.starts_with("session=;"));
    assert!(cleared.contains("Max-Age=0"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = me(&server, Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same stale cookie again, then no cookie at all
    let again = client
        .post(server.url("/api/logout"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::OK);

    let bare = client.post(server.url("/api/logout")).send().await.unwrap();
    assert_eq!(bare.status(), StatusCode::OK);
    let body: Value = bare.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_each_login_gets_distinct_session() {
    let server = start_test_server().await;

    let first = cookie_pair(&login(&server, "student", "password123").await);
    let second = cookie_pair(&login(&server, "student", "password123").await);
    assert_ne!(first, second);
    assert_eq!(server.state.sessions.len().await, 2);

    let (status, _) = me(&server, Some(&first)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = me(&server, Some(&second)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_static_dir_fallback() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>login</h1>").unwrap();
    fs::create_dir(dir.path().join("api")).unwrap();
    fs::write(dir.path().join("api").join("health"), "shadowed").unwrap();

    let server = start_test_server_with(Some(dir.path().to_path_buf())).await;

    let page = reqwest::get(server.url("/index.html")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert_eq!(page.text().await.unwrap(), "<h1>login</h1>");

    let root = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(root.status(), StatusCode::OK);

    // API routes take precedence over files with the same path
    let health = reqwest::get(server.url("/api/health")).await.unwrap();
    let body: Value = health.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = me(&server, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "authenticated": false }));

    let missing = reqwest::get(server.url("/nope.html")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_static_dir_means_not_found() {
    let server = start_test_server().await;
    let response = reqwest::get(server.url("/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_sweeper_removes_expired() {
    let server = start_test_server().await;
    let sessions = server.state.sessions.clone();

    sessions.create_at(1, Utc::now() - Duration::minutes(31)).await;
    sessions.create_at(1, Utc::now() - Duration::minutes(45)).await;
    let live = sessions.create(1).await;
    assert_eq!(sessions.len().await, 3);

    start_session_sweeper(sessions.clone(), std::time::Duration::from_millis(20));
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert_eq!(sessions.len().await, 1);
    let (status, _) = me(&server, Some(&format!("session={}", live))).await;
    assert_eq!(status, StatusCode::OK);
}
