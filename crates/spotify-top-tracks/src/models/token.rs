//! OAuth token models.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Token endpoint reply from the Spotify accounts service.
///
/// Unknown fields are kept in `extra` so a relayed body loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for Web API calls.
    pub access_token: String,

    /// Always "Bearer" in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Space-separated granted scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Lifetime of `access_token` in seconds.
    pub expires_in: u64,

    /// Present on code exchange; refresh replies may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Tokens held by a client between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub obtained_at: DateTime<Utc>,
}

impl TokenSet {
    /// Tokens obtained now.
    #[must_use]
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: u64) -> Self {
        Self { access_token, refresh_token, expires_in, obtained_at: Utc::now() }
    }

    /// Read the token triple out of the URL the proxy redirected the browser to.
    ///
    /// # Errors
    ///
    /// Fails if the redirect carries `error`, lacks `access_token`, or has a
    /// non-numeric `expires_in`.
    pub fn from_redirect_url(redirect: &str) -> Result<Self, TokenError> {
        let url = url::Url::parse(redirect)?;

        let mut access_token = None;
        let mut refresh_token = None;
        let mut expires_in = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "error" => return Err(TokenError::Denied(value.into_owned())),
                "access_token" => access_token = Some(value.into_owned()),
                "refresh_token" => refresh_token = Some(value.into_owned()),
                "expires_in" => expires_in = Some(value.into_owned()),
                _ => {}
            }
        }

        let access_token = access_token.ok_or(TokenError::MissingField("access_token"))?;
        let expires_in = match expires_in {
            Some(raw) => raw.parse().map_err(|_| TokenError::InvalidExpiry(raw))?,
            None => return Err(TokenError::MissingField("expires_in")),
        };

        Ok(Self::new(access_token, refresh_token, expires_in))
    }

    /// Instant the access token stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        let secs = i64::try_from(self.expires_in).unwrap_or(i64::MAX);
        Duration::try_seconds(secs)
            .and_then(|lifetime| self.obtained_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the access token has expired as of `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Whether the access token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Fold a refresh reply in, keeping the old refresh token if none came back.
    pub fn apply_refresh(&mut self, response: TokenResponse) {
        self.access_token = response.access_token;
        self.expires_in = response.expires_in;
        self.obtained_at = Utc::now();
        if let Some(refresh) = response.refresh_token {
            self.refresh_token = Some(refresh);
        }
    }
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token, response.expires_in)
    }
}
