//! Configuration for the Spotify top-tracks proxy.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Spotify endpoint and client tuning constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Spotify accounts service (authorize + token).
    pub const ACCOUNTS_URL: &str = "https://accounts.spotify.com";

    /// Base URL for the Spotify Web API.
    pub const WEB_API_URL: &str = "https://api.spotify.com/v1";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Cache TTL for Web API responses.
    pub const CACHE_TTL: Duration = Duration::from_secs(60);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 500;

    /// Retries for transient Web API failures.
    pub const MAX_RETRIES: u32 = 3;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Server defaults.
pub mod defaults {
    /// Listen port.
    pub const PORT: u16 = 8888;

    /// Callback registered with the Spotify app.
    pub const REDIRECT_URI: &str = "http://localhost:8888/callback";

    /// Where the browser lands after the token exchange.
    pub const FRONTEND_URI: &str = "http://localhost:3000";

    /// Built frontend served by the catch-all route.
    pub const STATIC_DIR: &str = "client/build";
}

/// Scopes requested on `/login`.
pub const SCOPES: &[&str] = &["user-read-private", "user-read-email", "user-top-read"];

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// Spotify application client id.
    pub client_id: String,

    /// Spotify application client secret.
    pub client_secret: String,

    /// OAuth redirect URI registered with Spotify (points at `/callback`).
    pub redirect_uri: String,

    /// Frontend origin the browser is sent back to with tokens.
    pub frontend_uri: String,

    /// Listen port.
    pub port: u16,

    /// Directory holding the built frontend.
    pub static_dir: PathBuf,

    /// Accounts service base URL (for testing with mock servers).
    pub accounts_url: String,

    /// Web API base URL (for testing with mock servers).
    pub api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Retries for transient Web API failures. The OAuth relay never retries.
    pub max_retries: u32,
}

impl Config {
    /// Create a configuration pointed at the real Spotify endpoints.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: defaults::REDIRECT_URI.to_string(),
            frontend_uri: defaults::FRONTEND_URI.to_string(),
            port: defaults::PORT,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            accounts_url: api::ACCOUNTS_URL.to_string(),
            api_url: api::WEB_API_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create a test configuration with both Spotify services on one mock server.
    ///
    /// The accounts service lives at the mock root, the Web API under `/v1`.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: "http://localhost:8888/callback".to_string(),
            frontend_uri: "http://localhost:3000".to_string(),
            port: 0,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            accounts_url: base_url.trim_end_matches('/').to_string(),
            api_url: format!("{}/v1", base_url.trim_end_matches('/')),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `CLIENT_ID` and `CLIENT_SECRET` are required; `REDIRECT_URI`,
    /// `FRONTEND_URI`, `PORT` and `STATIC_DIR` fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or `PORT` is not a number.
    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = std::env::var("CLIENT_ID").context("CLIENT_ID not set")?;
        let client_secret = std::env::var("CLIENT_SECRET").context("CLIENT_SECRET not set")?;

        let mut config = Self::new(client_id, client_secret);

        if let Ok(uri) = std::env::var("REDIRECT_URI") {
            config.redirect_uri = uri;
        }
        if let Ok(uri) = std::env::var("FRONTEND_URI") {
            config.frontend_uri = uri;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().with_context(|| format!("invalid PORT: {port}"))?;
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// The space-separated scope string sent to the authorize endpoint.
    #[must_use]
    pub fn scope(&self) -> String {
        SCOPES.join(" ")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("frontend_uri", &self.frontend_uri)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
