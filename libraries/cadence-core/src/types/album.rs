//! Album types

use super::artist::ArtistRef;
use super::song::Song;
use serde::{Deserialize, Serialize};

/// Album as listed on an artist page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: String,
    pub title: String,
    pub cover: String,
    pub release_year: Option<i32>,
    pub artist_id: String,
}

/// Album with its artist and songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub cover: String,
    pub release_year: Option<i32>,
    pub artist_id: String,
    pub artist: Option<ArtistRef>,
    pub songs: Vec<Song>,
}

/// Parse the year out of a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` release date
pub fn release_year(date: &str) -> Option<i32> {
    date.split('-').next()?.parse().ok()
}
