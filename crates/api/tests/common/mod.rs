//! Common test utilities for integration tests.
//!
//! Two kinds of tests share these helpers: tests that deliberately point
//! the repository at an unreachable address to exercise the degraded
//! paths, and tests that need a live PostgreSQL instance. The latter read
//! `TEST_DB_*` variables and skip themselves when none are configured.

// Allow dead code in this module - these are helper utilities that may not
// be used by every integration test binary.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use persistence::repositories::UserRepository;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use user_directory_api::{app::create_app, config::Config};

/// The application as served: the router behind trailing-slash
/// normalization, exactly as `main` wires it.
pub type TestApp = NormalizePath<Router>;

/// Builds the application for a given configuration.
pub fn create_test_app(config: Config) -> TestApp {
    let users = UserRepository::new(&config.database);
    NormalizePathLayer::trim_trailing_slash().layer(create_app(config, users))
}

/// Configuration pointing at a port nothing listens on, so every store
/// operation fails fast and the degraded paths are exercised.
pub fn unreachable_config() -> Config {
    Config::load_for_test(&[
        ("database.host", "127.0.0.1"),
        ("database.port", "9"),
        ("database.name", "users_test"),
        ("database.user", "nobody"),
        ("database.password", "nothing"),
    ])
    .expect("test config should load")
}

/// Configuration for a live test database, or `None` when the
/// environment does not provide one.
pub fn live_db_config() -> Option<Config> {
    let host = std::env::var("TEST_DB_HOST").ok()?;
    let name = std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "users_test".to_string());
    let user = std::env::var("TEST_DB_USER").unwrap_or_else(|_| "postgres".to_string());
    let password = std::env::var("TEST_DB_PASSWORD").unwrap_or_default();
    let port = std::env::var("TEST_DB_PORT").unwrap_or_else(|_| "5432".to_string());

    Config::load_for_test(&[
        ("database.host", host.as_str()),
        ("database.name", name.as_str()),
        ("database.user", user.as_str()),
        ("database.password", password.as_str()),
        ("database.port", port.as_str()),
    ])
    .ok()
}

/// Builds the application against the live test database, creating the
/// schema first. `None` when no test database is configured; callers
/// print a note and return early.
pub async fn live_app() -> Option<(TestApp, Config)> {
    let config = live_db_config()?;
    let users = UserRepository::new(&config.database);
    // Concurrent test binaries may race on CREATE TABLE IF NOT EXISTS;
    // whichever attempt loses still finds the table in place.
    if let Err(err) = users.ensure_schema().await {
        eprintln!("schema init reported {err}; continuing, the table may already exist");
    }
    Some((create_test_app(config.clone()), config))
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A request whose body is sent verbatim, for malformed-payload tests.
pub fn raw_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn parse_response_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
