//! Shared harness for the API integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) over a
//! per-test database and offers thin request helpers on top of
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::Algorithm;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use moviehub_api::admin_stats::llm::LlmConfig;
use moviehub_api::auth::jwt::JwtConfig;
use moviehub_api::auth::password::hash_password;
use moviehub_api::auth::yandex::YandexOAuthConfig;
use moviehub_api::config::ServerConfig;
use moviehub_api::router::build_app_router;
use moviehub_api::state::AppState;
use moviehub_core::roles::ROLE_ADMIN;
use moviehub_db::models::movie::{CreateMovie, Movie};
use moviehub_db::models::user::{CreateUser, User};
use moviehub_db::repositories::{MovieRepo, UserRepo};

/// Plaintext password of every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults.
///
/// The frontend probe points at an unroutable port, the LLM has no key and
/// Yandex OAuth is disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-key-for-integration-tests".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_mins: 30,
            refresh_token_expiry_days: 30,
        },
        frontend_url: "http://127.0.0.1:9".to_string(),
        frontend_health_timeout_secs: 1,
        llm: LlmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            model: "test-model".to_string(),
            timeout_secs: 5,
        },
        yandex: YandexOAuthConfig {
            client_id: None,
            client_secret: None,
            redirect_uri: "http://localhost:8000/api/auth/yandex/callback".to_string(),
            authorize_url: "https://oauth.yandex.ru/authorize".to_string(),
            token_url: "https://oauth.yandex.ru/token".to_string(),
            user_info_url: "https://login.yandex.ru/info".to_string(),
        },
    }
}

/// Build the full application router with the default test configuration.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the full application router with a custom configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn delete_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: Option<&str>) -> User {
    let input = CreateUser {
        email: format!("{username}@test.com"),
        username: username.to_string(),
        hashed_password: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.map(str::to_string),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the full JSON response.
pub async fn login(app: Router, email: &str, password: &str) -> Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/users/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Create a regular user and return it with an access token.
pub async fn user_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, None).await;
    let json = login(build_test_app(pool.clone()), &user.email, TEST_PASSWORD).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    (user, token)
}

/// Create an admin user and return it with an access token.
pub async fn admin_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, Some(ROLE_ADMIN)).await;
    let json = login(build_test_app(pool.clone()), &user.email, TEST_PASSWORD).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    (user, token)
}

/// Insert a movie with a precomputed `combined_rating` and the given genres.
pub async fn seed_movie(
    pool: &PgPool,
    kp_id: i64,
    title: &str,
    rating: Option<f64>,
    genres: &[&str],
) -> Movie {
    let input = CreateMovie {
        kp_id,
        title: title.to_string(),
        site_rating: rating,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        ..Default::default()
    };
    MovieRepo::create(pool, &input, rating)
        .await
        .expect("movie creation should succeed")
}
