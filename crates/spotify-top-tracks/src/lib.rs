//! Spotify Top Tracks
//!
//! An authorization-code OAuth proxy for the Spotify Web API, plus the data
//! layer a frontend needs to show a user's top tracks.
//!
//! # Features
//!
//! - **OAuth relay**: `/login`, `/callback` and `/refresh_token` keep the client
//!   secret on the server and hand tokens to the frontend
//! - **State nonce**: CSRF protection via a cookie checked on callback
//! - **Web API client**: top tracks and profile with retry and a short cache
//! - **Static frontend**: serves the built single-page app with an index fallback
//!
//! # Example
//!
//! ```no_run
//! use spotify_top_tracks::{config::Config, server::AuthProxyServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     AuthProxyServer::new(config).run().await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod server;

pub use client::{AccountsClient, SpotifyClient, TokenSession};
pub use config::Config;
pub use error::{ApiError, ClientError, TokenError};
