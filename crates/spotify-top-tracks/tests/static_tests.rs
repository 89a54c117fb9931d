//! Catch-all route serving the built frontend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use spotify_top_tracks::config::Config;
use spotify_top_tracks::server::routes::{AppState, router_with_state};

fn frontend_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<!doctype html><div id=\"root\"></div>").unwrap();
    std::fs::create_dir(dir.path().join("static")).unwrap();
    std::fs::write(dir.path().join("static").join("main.js"), "console.log('top tracks');").unwrap();
    dir
}

fn app(dir: &tempfile::TempDir) -> axum::Router {
    let state = Arc::new(AppState::new(&Config::for_testing("http://127.0.0.1:9")).unwrap());
    router_with_state(state, dir.path())
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_serves_existing_asset() {
    let dir = frontend_dir();

    let response =
        app(&dir).oneshot(Request::get("/static/main.js").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log('top tracks');");
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = frontend_dir();

    let response = app(&dir).oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("id=\"root\""));
}

#[tokio::test]
async fn test_client_side_route_falls_back_to_index() {
    let dir = frontend_dir();

    let response =
        app(&dir).oneshot(Request::get("/some/client/route").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("id=\"root\""));
}

#[tokio::test]
async fn test_api_routes_win_over_frontend() {
    let dir = frontend_dir();

    let response = app(&dir).oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("\"status\":\"ok\""));
}
