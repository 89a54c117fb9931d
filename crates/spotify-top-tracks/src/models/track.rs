//! Track and user models matching the Spotify Web API schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Cover art or avatar at one size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// An artist credit on a track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Spotify artist ID (absent for local files).
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

/// The album a track belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    /// Artwork, largest first.
    #[serde(default)]
    pub images: Vec<Image>,

    #[serde(default)]
    pub release_date: Option<String>,
}

/// A track from the Web API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Spotify track ID.
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub artists: Vec<Artist>,

    #[serde(default)]
    pub album: Album,

    /// Length in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,

    #[serde(default)]
    pub explicit: bool,

    /// 0-100, higher is more popular.
    #[serde(default)]
    pub popularity: Option<u32>,

    #[serde(default)]
    pub uri: Option<String>,

    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Track {
    /// Artist names joined with ", ".
    #[must_use]
    pub fn artist_names(&self) -> String {
        self.artists.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Link to the track on open.spotify.com, if provided.
    #[must_use]
    pub fn spotify_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// Smallest album image, as used for list thumbnails.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&Image> {
        self.album.images.last()
    }
}

/// A page of results from a Web API collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    #[serde(default)]
    pub total: u32,

    #[serde(default)]
    pub limit: u32,

    #[serde(default)]
    pub offset: u32,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub previous: Option<String>,
}

/// Follower count wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

/// The signed-in user (`GET /me`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Only present with the `user-read-email` scope.
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub images: Vec<Image>,

    #[serde(default)]
    pub followers: Followers,
}

impl UserProfile {
    /// Display name, falling back to the user ID.
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}
