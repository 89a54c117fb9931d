//! Spotify Web API client.
//!
//! Provides async reads with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient failures
//! - Response caching keyed on endpoint and access token

use std::time::Duration;

use moka::future::Cache;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use super::{handle_response, http_client};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Paging, TimeRange, Track, UserProfile};

/// Largest page the top-items endpoint accepts.
pub const MAX_LIMIT: u32 = 50;

/// Spotify Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response cache.
    cache: Cache<String, serde_json::Value>,

    /// Web API base URL.
    api_url: String,
}

impl SpotifyClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = http_client(config.request_timeout, config.connect_timeout)?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(10))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self { client, cache, api_url: config.api_url.clone() })
    }

    /// Get the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn current_user(&self, access_token: &str) -> ClientResult<UserProfile> {
        self.get(access_token, "me", &[]).await
    }

    /// Get the user's top tracks for a time range.
    ///
    /// `limit` is clamped to `1..=50`.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> ClientResult<Paging<Track>> {
        let limit = limit.clamp(1, MAX_LIMIT).to_string();
        let params = [("time_range", range.as_api_str()), ("limit", limit.as_str())];

        self.get(access_token, "me/top/tracks", &params).await
    }

    /// Make an authenticated GET request.
    async fn get<T>(&self, access_token: &str, path: &str, params: &[(&str, &str)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut url = url::Url::parse(&format!("{}/{}", self.api_url, path))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        // Check cache
        let cache_key = Self::cache_key("GET", url.as_str(), access_token);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::debug!(path, "Web API cache hit");
            return serde_json::from_value(cached).map_err(ClientError::from);
        }

        let response = self
            .client
            .get(url.as_str())
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await?;

        let response = handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        // Cache response
        self.cache.insert(cache_key, value.clone()).await;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Generate cache key; the access token only enters as part of the digest.
    fn cache_key(method: &str, url: &str, access_token: &str) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");
        hasher.update(access_token.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClient").field("api_url", &self.api_url).finish_non_exhaustive()
    }
}
