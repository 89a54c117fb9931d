//! End-to-end tests for the OAuth relay routes.
//!
//! The Spotify accounts service is a wiremock server; requests go through the
//! real axum router via `oneshot`.

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spotify_top_tracks::config::Config;
use spotify_top_tracks::server::routes::create_router;

/// base64("test-client-id:test-client-secret")
const BASIC_AUTH: &str = "Basic dGVzdC1jbGllbnQtaWQ6dGVzdC1jbGllbnQtc2VjcmV0";

fn build_test_router(mock_server: &MockServer) -> axum::Router {
    create_router(&Config::for_testing(&mock_server.uri())).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

fn query_pairs(location: &str) -> HashMap<String, String> {
    url::Url::parse(location).unwrap().query_pairs().into_owned().collect()
}

fn set_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|c| c.starts_with("spotify_auth_state="))
        .expect("state cookie")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn callback_request(query: &str, cookie_state: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(format!("/callback?{query}"));
    if let Some(state) = cookie_state {
        builder = builder.header(header::COOKIE, format!("spotify_auth_state={state}"));
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// /login
// =============================================================================

#[tokio::test]
async fn test_login_redirects_with_state_cookie() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app.oneshot(Request::get("/login").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);

    let location = location(&response);
    assert!(location.starts_with(&format!("{}/authorize?", mock_server.uri())));

    let params = query_pairs(&location);
    assert_eq!(params["client_id"], "test-client-id");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://localhost:8888/callback");
    assert_eq!(params["scope"], "user-read-private user-read-email user-top-read");

    let cookie = set_cookie(&response);
    let cookie_state = cookie.split(';').next().unwrap().trim_start_matches("spotify_auth_state=");
    assert_eq!(params["state"], cookie_state);
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_login_states_differ_between_requests() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let first = app.clone().oneshot(Request::get("/login").body(Body::empty()).unwrap()).await.unwrap();
    let second = app.oneshot(Request::get("/login").body(Body::empty()).unwrap()).await.unwrap();

    assert_ne!(query_pairs(&location(&first))["state"], query_pairs(&location(&second))["state"]);
}

// =============================================================================
// /callback
// =============================================================================

#[tokio::test]
async fn test_callback_exchanges_code_and_redirects_with_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header_eq("Authorization", BASIC_AUTH))
        .and(header_eq("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code-123"))
        .and(body_string_contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fcallback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "BQD-access",
            "token_type": "Bearer",
            "scope": "user-read-private user-read-email user-top-read",
            "expires_in": 3600,
            "refresh_token": "AQB-refresh"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app
        .oneshot(callback_request("code=auth-code-123&state=nonce1", Some("nonce1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);

    let location = location(&response);
    assert!(location.starts_with("http://localhost:3000/?"));

    let params = query_pairs(&location);
    assert_eq!(params["access_token"], "BQD-access");
    assert_eq!(params["refresh_token"], "AQB-refresh");
    assert_eq!(params["expires_in"], "3600");
    assert!(!params.contains_key("error"));

    // The nonce is single-use
    assert!(set_cookie(&response).starts_with("spotify_auth_state=;"));
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app
        .oneshot(callback_request("code=c&state=forged", Some("genuine")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(query_pairs(&location(&response))["error"], "state_mismatch");
}

#[tokio::test]
async fn test_callback_without_state_cookie() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app.oneshot(callback_request("code=c&state=s", None)).await.unwrap();

    assert_eq!(query_pairs(&location(&response))["error"], "state_mismatch");
}

#[tokio::test]
async fn test_callback_forwards_user_denial() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app
        .oneshot(callback_request("error=access_denied&state=s", Some("s")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(query_pairs(&location(&response))["error"], "access_denied");
}

#[tokio::test]
async fn test_callback_missing_code() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app.oneshot(callback_request("state=s", Some("s"))).await.unwrap();

    assert_eq!(query_pairs(&location(&response))["error"], "invalid_request");
}

#[tokio::test]
async fn test_callback_relays_upstream_rejection() {
    let mock_server = MockServer::start().await;

    let upstream = json!({
        "error": "invalid_grant",
        "error_description": "Invalid authorization code"
    });
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(upstream.clone()))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app.oneshot(callback_request("code=stale&state=s", Some("s"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert!(set_cookie(&response).starts_with("spotify_auth_state=;"));
    assert_eq!(body_json(response).await, upstream);
}

#[tokio::test]
async fn test_callback_relays_invalid_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid client"))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app.oneshot(callback_request("code=c&state=s", Some("s"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Invalid client");
}

#[tokio::test]
async fn test_callback_transport_failure_is_bad_gateway() {
    // Nothing listens on the discard port
    let app = create_router(&Config::for_testing("http://127.0.0.1:9")).unwrap();

    let response = app.oneshot(callback_request("code=c&state=s", Some("s"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "upstream_unavailable");
}

// =============================================================================
// /refresh_token
// =============================================================================

#[tokio::test]
async fn test_refresh_token_relays_new_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header_eq("Authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=AQB-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "BQD-new",
            "token_type": "Bearer",
            "scope": "user-read-private user-read-email user-top-read",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app
        .oneshot(Request::get("/refresh_token?refresh_token=AQB-refresh").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = body_json(response).await;
    assert_eq!(body["access_token"], "BQD-new");
    assert_eq!(body["expires_in"], 3600);
    assert!(body.get("refresh_token").is_none());
}

#[tokio::test]
async fn test_refresh_token_keeps_upstream_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"access_token": "a", "expires_in": 3600})),
        )
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app
        .oneshot(Request::get("/refresh_token?refresh_token=r").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(body_json(response).await["access_token"], "a");
}

#[tokio::test]
async fn test_refresh_token_relays_upstream_error_verbatim() {
    let mock_server = MockServer::start().await;

    let upstream = json!({"error": "invalid_grant", "error_description": "Refresh token revoked"});
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(upstream.clone()))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app
        .oneshot(Request::get("/refresh_token?refresh_token=revoked").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, upstream);
}

#[tokio::test]
async fn test_refresh_token_requires_parameter() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    for uri in ["/refresh_token", "/refresh_token?refresh_token="] {
        let response =
            app.clone().oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_request");
        assert_eq!(body["error_description"], "Missing refresh_token");
    }
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "spotify-top-tracks");
}
