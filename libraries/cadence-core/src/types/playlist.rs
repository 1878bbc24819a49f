//! Playlist types

use super::ids::{PlaylistId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User playlist of provider song ids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub cover: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Songs in playlist order (populated when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<PlaylistSong>>,
}

impl Playlist {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Public playlists are visible to everyone, private ones to their owner
    pub fn is_visible_to(&self, user_id: Option<&UserId>) -> bool {
        self.is_public || user_id.is_some_and(|id| self.is_owned_by(id))
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Partial playlist update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Song entry in a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSong {
    pub song_id: String,
    pub position: i64,
    pub added_at: DateTime<Utc>,
}

/// Song liked by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedSong {
    pub song_id: String,
    pub liked_at: DateTime<Utc>,
}
