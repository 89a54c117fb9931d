//! Data models for Spotify accounts and Web API entities.
//!
//! Web API models use `#[serde(default)]` for optional fields; Spotify's JSON
//! is already snake_case so no renaming is needed.

mod enums;
mod token;
mod track;

pub use enums::TimeRange;
pub use token::{TokenResponse, TokenSet};
pub use track::{Album, Artist, Followers, Image, Paging, Track, UserProfile};
