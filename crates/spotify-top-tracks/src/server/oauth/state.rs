//! OAuth `state` nonce: generated on `/login`, checked on `/callback`.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Cookie holding the nonce between `/login` and `/callback`.
pub const STATE_COOKIE: &str = "spotify_auth_state";

/// Generate a fresh nonce (128 random bits, hex).
#[must_use]
pub fn generate_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Cookie carrying `nonce` back to us on the callback.
#[must_use]
pub fn state_cookie(nonce: String) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, nonce))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the nonce once the callback has run.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(STATE_COOKIE).path("/").build()
}

/// The callback's `state` must equal the cookie's, and neither may be empty.
#[must_use]
pub fn state_matches(stored: Option<&str>, returned: Option<&str>) -> bool {
    match (stored, returned) {
        (Some(stored), Some(returned)) => !stored.is_empty() && stored == returned,
        _ => false,
    }
}
