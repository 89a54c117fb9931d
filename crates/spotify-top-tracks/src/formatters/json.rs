//! Compact JSON output formatting.

use serde_json::{Value, json};

use super::format_duration;
use crate::models::{Paging, TimeRange, Track};

/// Create a compact track representation for JSON output.
#[must_use]
pub fn compact_track(track: &Track, rank: usize) -> Value {
    let mut obj = json!({
        "rank": rank,
        "name": track.name,
        "artists": track.artists.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        "album": track.album.name,
        "duration": format_duration(track.duration_ms),
    });

    // Add optional fields only if present
    if let Some(id) = &track.id {
        obj["id"] = json!(id);
    }

    if let Some(url) = track.spotify_url() {
        obj["url"] = json!(url);
    }

    if let Some(image) = track.thumbnail() {
        obj["image"] = json!(image.url);
    }

    obj
}

/// Format a page of top tracks as a compact JSON document.
#[must_use]
pub fn format_top_tracks_json(page: &Paging<Track>, range: TimeRange) -> Value {
    json!({
        "time_range": range,
        "total": page.total,
        "tracks": page
            .items
            .iter()
            .enumerate()
            .map(|(i, t)| compact_track(t, page.offset as usize + i + 1))
            .collect::<Vec<_>>(),
    })
}
