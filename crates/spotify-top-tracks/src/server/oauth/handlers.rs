//! OAuth 2.0 relay handlers.
//!
//! Implements the browser side of RFC 6749's authorization code grant on
//! behalf of the frontend:
//! - `/login` sends the browser to Spotify with a state nonce
//! - `/callback` exchanges the code and hands tokens to the frontend
//! - `/refresh_token` swaps a refresh token for a new access token

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::state::{STATE_COOKIE, generate_state, removal_cookie, state_cookie, state_matches};
use crate::error::{ApiError, ApiResult, relay};
use crate::server::routes::AppState;

// ─── Login ───────────────────────────────────────────────────────────────────

/// `GET /login`
///
/// Store a fresh state nonce in a cookie and redirect to Spotify's authorize page.
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Response)> {
    let nonce = generate_state();
    let authorize_url = state.accounts.authorize_url(&nonce)?;

    tracing::info!("Redirecting to Spotify authorization");

    Ok((jar.add(state_cookie(nonce)), found(authorize_url)))
}

// ─── Callback ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// `GET /callback`
///
/// Exchange the authorization code and send the browser back to the frontend
/// with the token triple in the query string. A rejected exchange is relayed
/// with Spotify's status and body; no reply at all is a `502`.
pub async fn handle_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> (CookieJar, Response) {
    let stored_state = jar.get(STATE_COOKIE).map(|c| c.value().to_owned());
    let jar = jar.remove(removal_cookie());

    if let Some(ref error) = query.error {
        tracing::warn!(%error, "Authorization declined");
        return (jar, state.redirect_to_frontend(&[("error", error.as_str())]));
    }

    if !state_matches(stored_state.as_deref(), query.state.as_deref()) {
        tracing::warn!("OAuth state mismatch");
        return (jar, state.redirect_to_frontend(&[("error", "state_mismatch")]));
    }

    let Some(ref code) = query.code else {
        return (jar, state.redirect_to_frontend(&[("error", "invalid_request")]));
    };

    match state.accounts.exchange_code(code).await {
        Ok(tokens) => {
            tracing::info!(expires_in = tokens.expires_in, "Issued token triple to frontend");

            let expires_in = tokens.expires_in.to_string();
            let response = state.redirect_to_frontend(&[
                ("access_token", tokens.access_token.as_str()),
                ("refresh_token", tokens.refresh_token.as_deref().unwrap_or_default()),
                ("expires_in", expires_in.as_str()),
            ]);
            (jar, response)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Code exchange failed");
            (jar, ApiError::from(err).into_response())
        }
    }
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    pub refresh_token: Option<String>,
}

/// `GET /refresh_token`
///
/// Relay Spotify's reply (success or error) with its status and body intact.
pub async fn handle_refresh_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Response> {
    let Some(refresh_token) = query.refresh_token.filter(|t| !t.is_empty()) else {
        return Err(ApiError::MissingParameter("refresh_token"));
    };

    let reply = state.accounts.refresh_raw(&refresh_token).await?;

    tracing::info!(status = reply.status, "Refreshed access token");

    // Token responses must not be cached (RFC 6749 §5.1).
    let mut response = relay(reply.status, reply.body);
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    Ok(response)
}

/// `302 Found` to `location`.
pub(crate) fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
