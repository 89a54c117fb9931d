//! Error types for the Spotify top-tracks proxy.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Upstream replies keep their status code and body so handlers can relay them verbatim.

use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Access token rejected (401 response)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Response body from Spotify
        message: String,
    },

    /// Rate limited by Spotify (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
        /// Response body from Spotify
        message: String,
    },

    /// Any other non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body from Spotify
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Form body could not be encoded
    #[error("Failed to encode form: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// Malformed endpoint URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64, message: impl Into<String>) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds), message: message.into() }
    }

    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    /// Create an error for any other upstream status.
    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    /// Upstream HTTP status, if Spotify answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream response body, if Spotify answered at all.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::RateLimited { message, .. }
            | Self::Upstream { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Http(_) | Self::Middleware(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Error from an upstream Spotify call
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A required query parameter was absent
    #[error("Missing {0}")]
    MissingParameter(&'static str),

    /// A query parameter had an unusable value
    #[error("Invalid {field}: {message}")]
    InvalidParameter {
        /// Offending parameter
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// No `Authorization: Bearer` header on a Web API route
    #[error("Missing bearer token")]
    MissingBearer,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Client(err) => match (err.status(), err.body()) {
                (Some(status), Some(body)) => {
                    tracing::warn!(status, "Relaying upstream error");
                    relay(status, body.to_owned())
                }
                _ => {
                    tracing::error!(error = %err, "Upstream request failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        Json(serde_json::json!({
                            "error": "upstream_unavailable",
                            "error_description": err.to_string()
                        })),
                    )
                        .into_response()
                }
            },
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid_request",
                    "error_description": self.to_string()
                })),
            )
                .into_response(),
            Self::MissingBearer => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "invalid_token",
                        "error_description": self.to_string()
                    })),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
        }
    }
}

/// Build a response carrying an upstream status and body unchanged.
///
/// JSON bodies are labelled `application/json`; anything else goes out as plain text.
#[must_use]
pub fn relay(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
        "application/json"
    } else {
        "text/plain; charset=utf-8"
    };

    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// Errors reading tokens back out of the frontend redirect URL.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// The proxy redirected with `?error=...` instead of tokens
    #[error("Authorization failed: {0}")]
    Denied(String),

    /// A token parameter was absent
    #[error("Missing {0} in redirect")]
    MissingField(&'static str),

    /// `expires_in` was not a number of seconds
    #[error("Invalid expires_in: {0}")]
    InvalidExpiry(String),

    /// The redirect was not a URL
    #[error("Invalid redirect URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
