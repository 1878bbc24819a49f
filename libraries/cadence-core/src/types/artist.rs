//! Artist types

use super::album::AlbumSummary;
use super::song::Song;
use serde::{Deserialize, Serialize};

/// An artist with derived catalogue data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub image: String,

    /// Genres without duplicates, in first-seen order
    pub genres: Vec<String>,

    pub verified: bool,

    /// Most played songs first
    #[serde(default)]
    pub top_tracks: Vec<Song>,

    #[serde(default)]
    pub albums: Vec<AlbumSummary>,

    /// Empty when the backend cannot tell
    #[serde(default)]
    pub related_artists: Vec<ArtistSummary>,
}

/// Compact artist record used in related-artist lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub genres: Vec<String>,
}

/// Minimal artist reference embedded in albums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

impl Artist {
    /// Whether two artists share at least one genre
    pub fn shares_genre_with(&self, other: &Artist) -> bool {
        self.genres.iter().any(|g| other.genres.contains(g))
    }

    /// Compact form for related-artist lists
    pub fn summary(&self) -> ArtistSummary {
        ArtistSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            genres: self.genres.clone(),
        }
    }
}

/// Drop duplicate genres while keeping the first occurrence
pub fn dedup_genres(genres: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for genre in genres {
        if !unique.contains(&genre) {
            unique.push(genre);
        }
    }
    unique
}
