//! End-to-end router tests: public/protected classification, the login
//! flow, and the /api bounds contract, driven through tower's oneshot.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use ztadmin_backend::{
    auth::{Authenticator, BcryptScheme, CredentialStore, SessionStore},
    controller::ControllerClient,
    web::{build_router, AppState},
};

const ADMIN_PASSWORD: &str = "adminpassword";

fn build_test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();

    let credentials = CredentialStore::new(
        dir.path().join("passwd.json"),
        Box::new(BcryptScheme::with_cost(4)),
    );
    credentials.seed_default("admin", ADMIN_PASSWORD).unwrap();

    // Controller pointed at a port nothing listens on; any outbound call
    // from a test would fail, which is exactly what the routing tests rely
    // on never happening.
    std::fs::write(dir.path().join("authtoken.secret"), "testtoken").unwrap();
    let controller = ControllerClient::new("127.0.0.1:1", dir.path()).unwrap();

    let state = AppState {
        auth: Arc::new(Authenticator::new(credentials, SessionStore::default())),
        controller: Arc::new(controller),
    };

    (build_router(state), dir)
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// POST the login form and return the session cookie value.
async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username=admin&password={}",
                    ADMIN_PASSWORD
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    let session = set_cookie
        .split(';')
        .next()
        .unwrap()
        .strip_prefix("session=")
        .unwrap();
    assert!(session.starts_with("sess_"));
    session.to_string()
}

#[tokio::test]
async fn protected_route_redirects_without_session() {
    let (app, _dir) = build_test_app();

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/login?redirect=/");
}

#[tokio::test]
async fn unknown_path_redirects_before_404() {
    let (app, _dir) = build_test_app();

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/some/page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Auth runs first; the 404 is only reachable with a session
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/login?redirect=/some/page");
}

#[tokio::test]
async fn login_page_is_public() {
    let (app, _dir) = build_test_app();

    let resp = app
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("name=\"username\""));
}

#[tokio::test]
async fn login_then_dashboard() {
    let (app, _dir) = build_test_app();

    let session = login(&app).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, format!("session={}", session))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("ZeroTier Network Controller"));
}

#[tokio::test]
async fn login_with_wrong_password_rejected() {
    let (app, _dir) = build_test_app();

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=wrongpassword"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(resp).await.contains("Login Failed"));
}

#[tokio::test]
async fn logout_clears_session() {
    let (app, _dir) = build_test_app();

    let session = login(&app).await;
    let cookie = format!("session={}", session);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/login");
    assert!(resp.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .starts_with("session=;"));

    // The old cookie no longer authenticates
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn short_network_id_is_not_found_json() {
    let (app, _dir) = build_test_app();

    let session = login(&app).await;

    // 4-char id fails the fixed-width precondition before any outbound
    // call; the stub controller would error, not 404, if it were reached
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/networks/1234")
                .header(header::COOKIE, format!("session={}", session))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"], "API endpoint not found");
}

#[tokio::test]
async fn unknown_api_leaf_is_not_found_json() {
    let (app, _dir) = build_test_app();

    let session = login(&app).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/peers")
                .header(header::COOKIE, format!("session={}", session))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"], "API endpoint not found");
}

#[tokio::test]
async fn api_root_trailing_slash_is_not_found_json() {
    let (app, _dir) = build_test_app();

    let session = login(&app).await;

    // "/api/" has an empty remainder, so it misses the wildcard route;
    // the response still has to be the JSON envelope, not the HTML 404
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/")
                .header(header::COOKIE, format!("session={}", session))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"], "API endpoint not found");
}

#[tokio::test]
async fn api_without_session_redirects() {
    let (app, _dir) = build_test_app();

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/networks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers()[header::LOCATION],
        "/login?redirect=/api/networks"
    );
}

#[tokio::test]
async fn unknown_page_with_session_is_html_404() {
    let (app, _dir) = build_test_app();

    let session = login(&app).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/some/page")
                .header(header::COOKIE, format!("session={}", session))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_string(resp).await.contains("404 Not Found"));
}
