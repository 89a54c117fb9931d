//! Client-side token holder.
//!
//! Mirrors what the browser app does with the tokens it receives: keep them,
//! notice expiry, and ask the proxy's `/refresh_token` route for a new access
//! token. The client secret never leaves the proxy.

use std::future::Future;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use super::{handle_response, http_client};
use crate::config::api;
use crate::error::{ClientError, ClientResult};
use crate::models::{TokenResponse, TokenSet};

/// Tokens plus the proxy that can refresh them.
pub struct TokenSession {
    tokens: TokenSet,
    client: ClientWithMiddleware,
    proxy_url: String,
}

impl TokenSession {
    /// Create a session refreshing through the proxy at `proxy_url`.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(tokens: TokenSet, proxy_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = http_client(api::REQUEST_TIMEOUT, api::CONNECT_TIMEOUT)?;
        let client = ClientBuilder::new(client).build();
        let proxy_url = proxy_url.into().trim_end_matches('/').to_string();

        Ok(Self { tokens, client, proxy_url })
    }

    /// Current tokens.
    #[must_use]
    pub const fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    /// A usable access token, refreshing first if the current one has expired.
    pub async fn access_token(&mut self) -> ClientResult<String> {
        if self.tokens.is_expired() {
            tracing::debug!("Access token expired, refreshing");
            self.refresh().await?;
        }
        Ok(self.tokens.access_token.clone())
    }

    /// Ask the proxy for a new access token.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let Some(refresh_token) = self.tokens.refresh_token.as_deref() else {
            return Err(ClientError::unauthorized("no refresh token available"));
        };

        let mut url = url::Url::parse(&format!("{}/refresh_token", self.proxy_url))?;
        url.query_pairs_mut().append_pair("refresh_token", refresh_token);

        let response = self.client.get(url.as_str()).send().await?;
        let response = handle_response(response).await?;
        let reply: TokenResponse = response.json().await?;

        tracing::info!(expires_in = reply.expires_in, "Refreshed access token");
        self.tokens.apply_refresh(reply);
        Ok(())
    }

    /// Run `call` with a valid access token, refreshing and retrying once on 401.
    pub async fn call<T, F, Fut>(&mut self, call: F) -> ClientResult<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let token = self.access_token().await?;
        match call(token).await {
            Err(ClientError::Unauthorized { message }) if self.tokens.refresh_token.is_some() => {
                tracing::info!(%message, "Access token rejected, refreshing once");
                self.refresh().await?;
                call(self.tokens.access_token.clone()).await
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for TokenSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSession")
            .field("proxy_url", &self.proxy_url)
            .field("expires_at", &self.tokens.expires_at())
            .finish_non_exhaustive()
    }
}
