//! User activity feed

use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of recorded activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    PlayedSong,
    LikedSong,
    CreatedPlaylist,
    FollowedArtist,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::PlayedSong => "PLAYED_SONG",
            ActivityKind::LikedSong => "LIKED_SONG",
            ActivityKind::CreatedPlaylist => "CREATED_PLAYLIST",
            ActivityKind::FollowedArtist => "FOLLOWED_ARTIST",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYED_SONG" => Ok(ActivityKind::PlayedSong),
            "LIKED_SONG" => Ok(ActivityKind::LikedSong),
            "CREATED_PLAYLIST" => Ok(ActivityKind::CreatedPlaylist),
            "FOLLOWED_ARTIST" => Ok(ActivityKind::FollowedArtist),
            other => Err(format!("Unknown activity kind: {}", other)),
        }
    }
}

/// One entry in a user's activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
