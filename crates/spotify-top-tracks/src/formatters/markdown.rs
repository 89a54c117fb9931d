//! Markdown output formatting.

use super::format_duration;
use crate::models::{Paging, TimeRange, Track, UserProfile};

/// Format a page of top tracks as Markdown. Ranks continue from the page offset.
#[must_use]
pub fn format_top_tracks_markdown(page: &Paging<Track>, range: TimeRange) -> String {
    let mut output = format!("# Top Tracks ({})\n\n", range.label());

    if page.items.is_empty() {
        output.push_str("No top tracks yet. Listen to some music and check back.\n");
        return output;
    }

    for (i, track) in page.items.iter().enumerate() {
        output.push_str(&format_track_markdown(track, page.offset as usize + i + 1));
        output.push('\n');
    }

    output
}

/// Format one track as a numbered list entry.
#[must_use]
pub fn format_track_markdown(track: &Track, rank: usize) -> String {
    let title = match track.spotify_url() {
        Some(url) => format!("[{}]({url})", track.name),
        None => track.name.clone(),
    };

    let mut line = format!("{rank}. **{title}**");
    if track.explicit {
        line.push_str(" `E`");
    }

    let artists = track.artist_names();
    if !artists.is_empty() {
        line.push_str(&format!(" by {artists}"));
    }
    if !track.album.name.is_empty() {
        line.push_str(&format!(" · _{}_", track.album.name));
    }
    line.push_str(&format!(" · {}", format_duration(track.duration_ms)));

    line
}

/// One-line greeting for the signed-in user.
#[must_use]
pub fn format_profile_markdown(profile: &UserProfile) -> String {
    let mut line = format!("**{}**", profile.name());
    if profile.followers.total > 0 {
        line.push_str(&format!(" · {} followers", profile.followers.total));
    }
    line
}
