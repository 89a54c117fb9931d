//! Spotify accounts service client (authorization code flow).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use super::{handle_response, http_client};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::TokenResponse;

/// A successful token endpoint reply, as Spotify sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReply {
    /// 2xx status from the token endpoint.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl TokenReply {
    /// Decode the body as a [`TokenResponse`].
    pub fn parse(&self) -> ClientResult<TokenResponse> {
        serde_json::from_str(&self.body).map_err(ClientError::from)
    }
}

/// Client for `accounts.spotify.com`.
#[derive(Clone)]
pub struct AccountsClient {
    client: ClientWithMiddleware,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    accounts_url: String,
    scope: String,
}

impl AccountsClient {
    /// Create a client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = http_client(config.request_timeout, config.connect_timeout)?;
        let client = ClientBuilder::new(client).build();

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            accounts_url: config.accounts_url.clone(),
            scope: config.scope(),
        })
    }

    /// Build the authorize URL the browser is sent to from `/login`.
    pub fn authorize_url(&self, state: &str) -> ClientResult<String> {
        let mut url = url::Url::parse(&format!("{}/authorize", self.accounts_url))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state)
            .append_pair("scope", &self.scope);

        Ok(url.into())
    }

    /// Exchange an authorization code for the token triple.
    pub async fn exchange_code(&self, code: &str) -> ClientResult<TokenResponse> {
        let reply = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .await?;

        reply.parse()
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenResponse> {
        self.refresh_raw(refresh_token).await?.parse()
    }

    /// Like [`refresh`](Self::refresh) but returns Spotify's status and body
    /// untouched, for relaying.
    pub async fn refresh_raw(&self, refresh_token: &str) -> ClientResult<TokenReply> {
        self.request_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .await
    }

    /// POST a form to the token endpoint with client credentials.
    async fn request_token(&self, form: &[(&str, &str)]) -> ClientResult<TokenReply> {
        let url = format!("{}/api/token", self.accounts_url);
        let body = serde_urlencoded::to_string(form)?;

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(AUTHORIZATION, self.basic_credentials())
            .body(body)
            .send()
            .await?;

        let response = handle_response(response).await?;
        let status = response.status().as_u16();
        Ok(TokenReply { status, body: response.text().await? })
    }

    /// `Basic base64(client_id:client_secret)`.
    fn basic_credentials(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for AccountsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountsClient")
            .field("client_id", &self.client_id)
            .field("accounts_url", &self.accounts_url)
            .finish_non_exhaustive()
    }
}
