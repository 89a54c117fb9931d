//! OAuth 2.0 authorization code relay for the Spotify accounts service.
//!
//! The proxy holds the client secret; the browser only ever sees the state
//! nonce (in a cookie) and the resulting tokens (in the redirect query).

pub mod handlers;
pub mod state;
