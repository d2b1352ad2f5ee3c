#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use capstone_api::auth::jwt::{generate_access_token, JwtConfig};
use capstone_api::auth::password::hash_password;
use capstone_api::config::ServerConfig;
use capstone_api::router::build_app_router;
use capstone_api::state::AppState;
use capstone_db::models::project::{CreateProject, Project};
use capstone_db::models::user::{CreateUser, User};
use capstone_db::repositories::{ProjectRepo, UserRepo};
use capstone_events::{EventBus, SharedPoller};
use capstone_ocr::OcrClient;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "capstone-pass";

/// Test configuration. The OCR URL points at a port nothing listens on.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8081".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        analytics_refresh_secs: 20,
        ocr_service_url: "http://127.0.0.1:9".to_string(),
        ocr_timeout_secs: 2,
        jwt: JwtConfig {
            secret: "capstone-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        admin_bootstrap: None,
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    let config = test_config();
    let ocr = OcrClient::new(
        &config.ocr_service_url,
        Duration::from_secs(config.ocr_timeout_secs),
    )
    .unwrap();

    AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
        ocr,
        analytics: Arc::new(SharedPoller::new("analytics", Duration::from_secs(20))),
        shutdown: CancellationToken::new(),
    }
}

/// Build the production router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config())
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an account directly, bypassing signup rules.
pub async fn create_user(pool: &PgPool, email: &str, role: &str, status: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            full_name: email.split('@').next().unwrap().to_string(),
            role: role.to_string(),
            status: status.to_string(),
            year_level: Some("4th Year".to_string()),
            block: Some("A".to_string()),
            gender: None,
        },
    )
    .await
    .unwrap()
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

pub fn project_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "title_description": "Capstone submission",
        "abstract": "An archive of capstone projects with moderation, bookmarks and comments for students.",
        "source_code_url": "https://github.com/example/capstone",
        "video_url": "https://youtu.be/capstone",
        "pdf_url": "https://cdn.example.com/capstone.pdf",
        "category": "Web",
    })
}

/// Insert a pending project owned by `owner`.
pub async fn submit(pool: &PgPool, owner: &User, title: &str) -> Project {
    let input: CreateProject = serde_json::from_value(project_body(title)).unwrap();
    ProjectRepo::create(pool, owner.id, &input).await.unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        b = b.header("authorization", format!("Bearer {token}"));
    }
    b
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, None)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, Some(token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        builder(Method::PUT, uri, Some(token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
