//! Integration tests for the provider client against a mock HTTP server.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use fleetiq_provider::api::ProviderApi;
use fleetiq_provider::auth::{AuthManager, MIN_BEARER_TOKEN_LEN, MIN_SECURITY_TOKEN_LEN};
use fleetiq_provider::bulk::BulkFetcher;
use fleetiq_provider::config::ProviderConfig;
use fleetiq_provider::ProviderError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bearer() -> String {
    "b".repeat(MIN_BEARER_TOKEN_LEN)
}

fn security() -> String {
    "s".repeat(MIN_SECURITY_TOKEN_LEN)
}

fn login_body() -> String {
    json!({
        "bearerToken": bearer(),
        "securityToken": security(),
        "expiresIn": 3600
    })
    .to_string()
}

fn setup(server: &mockito::ServerGuard) -> (Arc<ProviderApi>, Arc<AuthManager>, ProviderConfig) {
    let config = ProviderConfig::for_tests(server.url());
    let api = Arc::new(ProviderApi::new(config.base_url.clone()));
    let auth = Arc::new(AuthManager::new(Arc::clone(&api), &config));
    (api, auth, config)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_produces_usable_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;

    let (_, auth, _) = setup(&server);
    let session = auth.get_session().await.unwrap();

    assert_eq!(session.bearer_token, bearer());
    assert_eq!(session.security_token, security());
    assert!(session.is_fresh());
    mock.assert_async().await;
}

#[tokio::test]
async fn short_bearer_token_is_an_auth_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(
            json!({
                "bearerToken": "b".repeat(40),
                "securityToken": security(),
                "expiresIn": 3600
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (_, auth, _) = setup(&server);
    let err = auth.get_session().await.unwrap_err();
    assert!(matches!(err, ProviderError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn login_rejection_is_an_auth_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_body(r#"{"error":"bad credentials"}"#)
        .create_async()
        .await;

    let (_, auth, _) = setup(&server);
    assert!(matches!(
        auth.get_session().await.unwrap_err(),
        ProviderError::Auth(_)
    ));
}

/// Two concurrent callers with no cached session trigger exactly one login.
#[tokio::test]
async fn concurrent_session_requests_single_flight() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .expect(1)
        .create_async()
        .await;

    let (_, auth, _) = setup(&server);
    let (a, b) = tokio::join!(auth.get_session(), auth.get_session());

    assert!(a.is_ok() && b.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn invalidate_forces_relogin() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .expect(2)
        .create_async()
        .await;

    let (_, auth, _) = setup(&server);
    auth.get_session().await.unwrap();
    auth.invalidate().await;
    auth.get_session().await.unwrap();

    mock.assert_async().await;
}

// ---------------------------------------------------------------------------
// Bulk export pagination
// ---------------------------------------------------------------------------

fn rows(n: usize) -> Vec<serde_json::Value> {
    (0..n).map(|i| json!({ "aircraftid": i })).collect()
}

/// A full page means fetch the next; a short page stops.
#[tokio::test]
async fn short_page_terminates_pagination() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;

    let export_path = format!("/api/aircraft/exportlist/{}", security());
    server
        .mock("POST", export_path.as_str())
        .match_body(Matcher::PartialJson(json!({ "page": 1 })))
        .with_status(200)
        .with_body(json!(rows(3)).to_string())
        .create_async()
        .await;
    server
        .mock("POST", export_path.as_str())
        .match_body(Matcher::PartialJson(json!({ "page": 2 })))
        .with_status(200)
        .with_body(json!({ "aircraft": rows(2) }).to_string())
        .create_async()
        .await;

    let (api, auth, mut config) = setup(&server);
    config.page_size = 3;
    let fetcher = BulkFetcher::new(api, auth, &config);

    let records = fetcher
        .fetch_all(&json!({}), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 5);
}

/// A provider that always returns a full page stops at the configured
/// ceiling instead of looping forever.
#[tokio::test]
async fn full_pages_stop_at_the_page_ceiling() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;

    let export_path = format!("/api/aircraft/exportlist/{}", security());
    let pages = server
        .mock("POST", export_path.as_str())
        .with_status(200)
        .with_body(json!(rows(2)).to_string())
        .expect(3)
        .create_async()
        .await;

    let (api, auth, mut config) = setup(&server);
    config.page_size = 2;
    config.max_pages = 3;
    let fetcher = BulkFetcher::new(api, auth, &config);

    let records = fetcher
        .fetch_all(&json!({}), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 6);
    pages.assert_async().await;
}

#[tokio::test]
async fn mid_pagination_failure_aborts_the_fetch() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;

    let export_path = format!("/api/aircraft/exportlist/{}", security());
    server
        .mock("POST", export_path.as_str())
        .match_body(Matcher::PartialJson(json!({ "page": 1 })))
        .with_status(200)
        .with_body(json!(rows(2)).to_string())
        .create_async()
        .await;
    server
        .mock("POST", export_path.as_str())
        .match_body(Matcher::PartialJson(json!({ "page": 2 })))
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let (api, auth, mut config) = setup(&server);
    config.page_size = 2;
    let fetcher = BulkFetcher::new(api, auth, &config);

    let err = fetcher
        .fetch_all(&json!({}), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Api { status: 503, .. }));
}

#[tokio::test]
async fn cancelled_fetch_stops_before_requesting() {
    let server = mockito::Server::new_async().await;
    let (api, auth, config) = setup(&server);
    let fetcher = BulkFetcher::new(api, auth, &config);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = fetcher.fetch_all(&json!({}), &cancel).await.unwrap_err();
    assert!(matches!(err, ProviderError::Cancelled));
}

// ---------------------------------------------------------------------------
// Category endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn category_returns_payload_when_present() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;
    let path = format!("/api/aircraft/avionics/1001/{}", security());
    server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(r#"{"avionicssuite":"Garmin G5000"}"#)
        .create_async()
        .await;

    let (api, auth, _) = setup(&server);
    let session = auth.get_session().await.unwrap();
    let payload = api
        .fetch_category(&session, "1001", "avionics")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload["avionicssuite"], "Garmin G5000");
}

#[tokio::test]
async fn category_not_found_is_absent_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;
    let path = format!("/api/aircraft/apu/1001/{}", security());
    server
        .mock("GET", path.as_str())
        .with_status(404)
        .create_async()
        .await;

    let (api, auth, _) = setup(&server);
    let session = auth.get_session().await.unwrap();
    assert!(api
        .fetch_category(&session, "1001", "apu")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn empty_category_body_is_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;
    let path = format!("/api/aircraft/interior/1001/{}", security());
    server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let (api, auth, _) = setup(&server);
    let session = auth.get_session().await.unwrap();
    assert!(api
        .fetch_category(&session, "1001", "interior")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn malformed_category_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;
    let path = format!("/api/aircraft/engines/1001/{}", security());
    server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body("<html>gateway timeout</html>")
        .create_async()
        .await;

    let (api, auth, _) = setup(&server);
    let session = auth.get_session().await.unwrap();
    assert!(matches!(
        api.fetch_category(&session, "1001", "engines").await,
        Err(ProviderError::Malformed(_))
    ));
}

#[tokio::test]
async fn images_unwrap_both_shapes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(login_body())
        .create_async()
        .await;
    let path = format!("/api/aircraft/images/1001/{}", security());
    server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(json!({ "images": [{ "url": "https://img.example.com/a.jpg" }] }).to_string())
        .create_async()
        .await;

    let (api, auth, _) = setup(&server);
    let session = auth.get_session().await.unwrap();
    let images = api.fetch_images(&session, "1001").await.unwrap();
    assert_eq!(images.len(), 1);
}
