//! HTTP server for the Spotify auth proxy.
//!
//! Routes:
//! - `/login`, `/callback`, `/refresh_token`: authorization code relay
//! - `/api/top-tracks`: bearer-authenticated Web API passthrough
//! - `/health`: liveness
//! - everything else: the built frontend

pub mod oauth;
pub mod routes;

use std::net::SocketAddr;

use crate::config::Config;

/// Auth proxy server.
pub struct AuthProxyServer {
    config: Config,
}

impl AuthProxyServer {
    /// Create a new server.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bind and serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run(self) -> anyhow::Result<()> {
        let router = routes::create_router(&self.config)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        tracing::info!(
            frontend_uri = %self.config.frontend_uri,
            redirect_uri = %self.config.redirect_uri,
            static_dir = %self.config.static_dir.display(),
            "HTTP server listening on http://{}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }

    /// Server configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for AuthProxyServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProxyServer").field("port", &self.config.port).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
