//! Shared helpers for API integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use fleetiq_api::config::ServerConfig;
use fleetiq_api::router::build_app_router;
use fleetiq_api::state::AppState;
use fleetiq_provider::config::ProviderConfig;
use fleetiq_sync::config::SyncConfig;
use fleetiq_sync::pipeline::SyncPipeline;

/// Build the full application router against the given pool and provider
/// base URL.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool, provider_base_url: &str) -> Router {
    let config = ServerConfig::for_tests();
    let pipeline = Arc::new(SyncPipeline::new(
        pool.clone(),
        &ProviderConfig::for_tests(provider_base_url),
        &SyncConfig::for_tests(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
        shutdown: tokio_util::sync::CancellationToken::new(),
    };

    build_app_router(state, &config)
}

/// Read-side tests never reach the provider; any unroutable URL works.
pub fn build_read_app(pool: PgPool) -> Router {
    build_test_app(pool, "http://127.0.0.1:9")
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request dispatch")
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request dispatch")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is valid JSON")
}

/// Assert a JSON error envelope with the given status and code.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
}
