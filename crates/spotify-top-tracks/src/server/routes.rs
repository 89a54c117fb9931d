//! HTTP router: OAuth relay, Web API passthrough, health, and the built frontend.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::oauth::handlers::{found, handle_callback, handle_login, handle_refresh_token};
use crate::client::{AccountsClient, SpotifyClient};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{Paging, TimeRange, Track};

/// Default page size for `/api/top-tracks`.
const DEFAULT_TOP_LIMIT: u32 = 20;

/// Shared state for HTTP handlers.
pub struct AppState {
    pub accounts: AccountsClient,
    pub spotify: SpotifyClient,
    /// Frontend origin tokens are handed back to.
    pub frontend_uri: String,
}

impl AppState {
    /// Build the upstream clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be initialized.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            accounts: AccountsClient::new(config)?,
            spotify: SpotifyClient::new(config)?,
            frontend_uri: config.frontend_uri.clone(),
        })
    }

    /// `302` to the frontend root with `params` as the query string.
    #[must_use]
    pub fn redirect_to_frontend(&self, params: &[(&str, &str)]) -> Response {
        found(frontend_redirect_url(&self.frontend_uri, params))
    }
}

/// `{frontend_uri}/?{params}`, form-urlencoded.
#[must_use]
pub fn frontend_redirect_url(frontend_uri: &str, params: &[(&str, &str)]) -> String {
    let query = serde_urlencoded::to_string(params).unwrap_or_default();
    format!("{}/?{query}", frontend_uri.trim_end_matches('/'))
}

/// Create the HTTP router.
///
/// # Errors
///
/// Returns error if the upstream clients cannot be initialized.
pub fn create_router(config: &Config) -> anyhow::Result<Router> {
    let state = Arc::new(AppState::new(config)?);
    Ok(router_with_state(state, &config.static_dir))
}

/// Assemble routes around an existing state.
pub fn router_with_state(state: Arc<AppState>, static_dir: &Path) -> Router {
    // Unknown paths get index.html so client-side routes survive a reload.
    let frontend = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(handle_login))
        .route("/callback", get(handle_callback))
        .route("/refresh_token", get(handle_refresh_token))
        .route("/api/top-tracks", get(handle_top_tracks))
        .fallback_service(frontend)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "spotify-top-tracks",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Deserialize)]
pub struct TopTracksQuery {
    pub time_range: Option<String>,
    pub limit: Option<u32>,
}

/// `GET /api/top-tracks`
///
/// Fetch the caller's top tracks with their own bearer token.
async fn handle_top_tracks(
    State(state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<TopTracksQuery>,
) -> ApiResult<Json<Paging<Track>>> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ApiError::MissingBearer);
    };

    let range = match query.time_range.as_deref() {
        Some(raw) => raw
            .parse::<TimeRange>()
            .map_err(|message| ApiError::InvalidParameter { field: "time_range", message })?,
        None => TimeRange::default(),
    };
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);

    tracing::debug!(%range, limit, "Fetching top tracks");

    let page = state.spotify.top_tracks(bearer.token(), range, limit).await?;
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_redirect_url() {
        let url = frontend_redirect_url(
            "http://localhost:3000/",
            &[("access_token", "a b"), ("expires_in", "3600")],
        );
        assert_eq!(url, "http://localhost:3000/?access_token=a+b&expires_in=3600");
    }

    #[test]
    fn test_frontend_redirect_url_error() {
        let url = frontend_redirect_url("https://app.example.com", &[("error", "state_mismatch")]);
        assert_eq!(url, "https://app.example.com/?error=state_mismatch");
    }
}
