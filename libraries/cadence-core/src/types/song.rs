//! Provider-normalized song type

use serde::{Deserialize, Serialize};

/// A song as returned by any music provider
///
/// `audio_url` may be empty (no playable audio) or a time-limited preview.
/// Consumers treat both as valid, non-fatal states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,

    /// Duration in seconds
    pub duration: u32,

    #[serde(default)]
    pub audio_url: String,

    #[serde(default)]
    pub cover: String,

    #[serde(default)]
    pub genre: String,

    #[serde(default)]
    pub mood: String,

    #[serde(default)]
    pub play_count: u64,

    pub artist_id: String,

    #[serde(default)]
    pub artist_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,

    /// Audio is a time-limited preview clip
    #[serde(default)]
    pub has_preview: bool,

    /// Audio is the complete recording
    #[serde(default)]
    pub is_full_song: bool,

    /// Link to the song on the backend's own site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Song {
    /// Whether there is any audio to hand to a player
    pub fn is_playable(&self) -> bool {
        !self.audio_url.is_empty()
    }
}
