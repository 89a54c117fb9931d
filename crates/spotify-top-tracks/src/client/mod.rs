//! Spotify HTTP clients.
//!
//! - [`AccountsClient`]: authorize URL, code exchange and refresh against the
//!   accounts service. Never retries; authorization codes are single-use.
//! - [`SpotifyClient`]: Web API reads with retry middleware and a short-lived
//!   response cache.
//! - [`TokenSession`]: the browser-side token holder, refreshing through the
//!   proxy's `/refresh_token` route.

mod accounts;
mod session;
mod web_api;

pub use accounts::{AccountsClient, TokenReply};
pub use session::TokenSession;
pub use web_api::{MAX_LIMIT, SpotifyClient};

use std::time::Duration;

use reqwest::Client;

use crate::config::api;
use crate::error::{ClientError, ClientResult};

/// Build the pooled reqwest client shared by every Spotify client.
fn http_client(request_timeout: Duration, connect_timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()
}

/// Map a non-success status to a [`ClientError`] that keeps the upstream body.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::unauthorized(text))
        }
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            let text = response.text().await.unwrap_or_default();

            Err(ClientError::rate_limited(retry_after, text))
        }
        code => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::upstream(code, text))
        }
    }
}
