//! Spotify Web API response shapes (only the fields we read).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Default, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimpleArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SimpleAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub album: Option<SimpleAlbum>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Deserialize)]
pub struct TrackList {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct FullArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub followers: Followers,
}

#[derive(Debug, Deserialize)]
pub struct RelatedArtists {
    pub artists: Vec<FullArtist>,
}

/// Album track: a track without its own album object
#[derive(Debug, Deserialize)]
pub struct AlbumTrack {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub struct FullAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    pub tracks: Paging<AlbumTrack>,
}
