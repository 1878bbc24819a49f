//! Jamendo provider.
//!
//! Open-license catalogue with full-length audio. Authentication is a plain
//! `client_id` query parameter.

mod types;

use async_trait::async_trait;
use cadence_core::{
    dedup_genres, release_year, Album, AlbumSummary, Artist, ArtistRef, RecommendationContext,
    Recommendations, SearchFilters, Song, StreamInfo, StreamQuality,
};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::{require, JamendoConfig};
use crate::error::{ProviderError, Result};
use crate::http;
use crate::provider::{log_lookup_failure, MusicProvider};
use types::{AlbumRecord, ArtistRecord, Envelope, Track};

const AUDIO_FORMAT: &str = "mp32";
const DEFAULT_LIMIT: usize = 20;
const ARTIST_TRACKS_LIMIT: usize = 20;
const ARTIST_ALBUMS_LIMIT: usize = 20;
const SHELF_SIZE: usize = 20;

const STREAM_QUALITY: &str = "192kbps VBR";
const STREAM_MESSAGE: &str = "Full song playback available!";
const STREAM_TTL_HOURS: i64 = 24;

const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/300";
const PLACEHOLDER_ARTIST_IMAGE: &str = "https://via.placeholder.com/400";

type Params = Vec<(&'static str, String)>;

pub struct JamendoProvider {
    http: Client,
    api_url: Url,
    client_id: String,
}

impl JamendoProvider {
    pub fn new(config: &JamendoConfig) -> Result<Self> {
        Ok(Self {
            http: http::build_client()?,
            api_url: http::parse_base_url(&config.api_url)?,
            client_id: require(&config.client_id, "jamendo", "client_id")?,
        })
    }

    /// Query parameters shared by every request
    fn base_params(&self) -> Params {
        vec![
            ("client_id", self.client_id.clone()),
            ("format", "json".to_string()),
        ]
    }

    /// Base parameters plus the audio options every track query carries
    fn track_params(&self) -> Params {
        let mut params = self.base_params();
        params.push(("audioformat", AUDIO_FORMAT.to_string()));
        params.push(("include", "musicinfo".to_string()));
        params
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, params: &Params) -> Result<Vec<T>> {
        let url = http::endpoint(&self.api_url, &[resource])?;

        debug!(url = %url, "Jamendo request");

        let response = self.http.get(url).query(params).send().await?;
        let envelope: Envelope<T> = http::read_json(response).await?;

        if !envelope.headers.is_success() {
            return Err(ProviderError::Rejected {
                code: envelope.headers.code,
                message: envelope.headers.error_message,
            });
        }

        Ok(envelope.results)
    }

    async fn fetch_tracks(&self, params: Params) -> Result<Vec<Song>> {
        let tracks: Vec<Track> = self.get("tracks", &params).await?;
        Ok(tracks.into_iter().map(format_track).collect())
    }

    /// Year and mood have no Jamendo query parameter and are ignored
    async fn fetch_search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Song>> {
        let mut params = self.track_params();
        params.push(("limit", filters.effective_limit(DEFAULT_LIMIT).to_string()));
        params.push(("search", query.trim().to_string()));
        if let Some(genre) = &filters.genre {
            params.push(("tags", genre.to_lowercase()));
        }
        if let Some(artist_id) = &filters.artist_id {
            params.push(("artist_id", artist_id.clone()));
        }

        self.fetch_tracks(params).await
    }

    async fn fetch_song(&self, id: &str) -> Result<Option<Song>> {
        let mut params = self.track_params();
        params.push(("id", id.to_string()));

        Ok(self.fetch_tracks(params).await?.into_iter().next())
    }

    async fn fetch_artist(&self, id: &str) -> Result<Option<Artist>> {
        let mut params = self.base_params();
        params.push(("id", id.to_string()));
        let Some(artist) = self.get::<ArtistRecord>("artists", &params).await?.into_iter().next()
        else {
            return Ok(None);
        };

        let mut track_params = self.track_params();
        track_params.push(("artist_id", id.to_string()));
        track_params.push(("limit", ARTIST_TRACKS_LIMIT.to_string()));
        track_params.push(("order", "popularity_total".to_string()));
        let top_tracks = self.fetch_tracks(track_params).await?;

        let mut album_params = self.base_params();
        album_params.push(("artist_id", id.to_string()));
        album_params.push(("limit", ARTIST_ALBUMS_LIMIT.to_string()));
        let albums = self
            .get::<AlbumRecord>("albums", &album_params)
            .await?
            .into_iter()
            .map(|album| AlbumSummary {
                cover: non_empty_or(album.image, PLACEHOLDER_COVER),
                release_year: release_year(&album.releasedate),
                artist_id: id.to_string(),
                id: album.id,
                title: album.name,
            })
            .collect();

        let bio = artist
            .bio
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| format!("{} - Independent artist on Jamendo", artist.name));

        Ok(Some(Artist {
            id: artist.id,
            bio,
            image: non_empty_or(artist.image, PLACEHOLDER_ARTIST_IMAGE),
            genres: dedup_genres(artist.musicinfo.unwrap_or_default().tags.genres),
            name: artist.name,
            verified: true,
            top_tracks,
            albums,
            related_artists: Vec::new(),
        }))
    }

    async fn fetch_album(&self, id: &str) -> Result<Option<Album>> {
        let mut params = self.base_params();
        params.push(("id", id.to_string()));
        let Some(album) = self.get::<AlbumRecord>("albums", &params).await?.into_iter().next()
        else {
            return Ok(None);
        };

        let mut track_params = self.track_params();
        track_params.push(("album_id", id.to_string()));
        let songs = self.fetch_tracks(track_params).await?;

        Ok(Some(Album {
            release_year: release_year(&album.releasedate),
            cover: non_empty_or(album.image, PLACEHOLDER_COVER),
            artist: Some(ArtistRef {
                id: album.artist_id.clone(),
                name: album.artist_name,
            }),
            artist_id: album.artist_id,
            id: album.id,
            title: album.name,
            songs,
        }))
    }

    /// One recommendation shelf; failures only empty that shelf
    async fn shelf(&self, tag: Option<&str>) -> Vec<Song> {
        let mut params = self.track_params();
        params.push(("order", "popularity_week".to_string()));
        params.push(("limit", SHELF_SIZE.to_string()));
        if let Some(tag) = tag {
            params.push(("tags", tag.to_string()));
        }

        self.fetch_tracks(params).await.unwrap_or_else(|e| {
            warn!(provider = "jamendo", tag = ?tag, error = %e, "Recommendation shelf failed");
            Vec::new()
        })
    }
}

#[async_trait]
impl MusicProvider for JamendoProvider {
    fn name(&self) -> &'static str {
        "jamendo"
    }

    async fn search_songs(&self, query: &str, filters: &SearchFilters) -> Vec<Song> {
        match self.fetch_search(query, filters).await {
            Ok(songs) => songs,
            Err(e) => {
                warn!(provider = "jamendo", query, error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    async fn get_song(&self, id: &str) -> Option<Song> {
        self.fetch_song(id)
            .await
            .unwrap_or_else(|e| {
                log_lookup_failure("jamendo", "get_song", id, &e);
                None
            })
    }

    async fn get_artist(&self, id: &str) -> Option<Artist> {
        self.fetch_artist(id)
            .await
            .unwrap_or_else(|e| {
                log_lookup_failure("jamendo", "get_artist", id, &e);
                None
            })
    }

    async fn get_album(&self, id: &str) -> Option<Album> {
        self.fetch_album(id)
            .await
            .unwrap_or_else(|e| {
                log_lookup_failure("jamendo", "get_album", id, &e);
                None
            })
    }

    async fn get_recommendations(
        &self,
        user_id: &str,
        _context: &RecommendationContext,
    ) -> Recommendations {
        let (daily_mix, discover_weekly, because_you_listened) = tokio::join!(
            self.shelf(None),
            self.shelf(Some("electronic")),
            self.shelf(Some("rock")),
        );

        debug!(user_id, "Jamendo recommendations");

        Recommendations {
            daily_mix,
            discover_weekly,
            because_you_listened,
        }
    }

    async fn get_stream_url(&self, song_id: &str, _quality: StreamQuality) -> Option<StreamInfo> {
        let song = self.get_song(song_id).await?;

        Some(StreamInfo {
            url: song.audio_url,
            quality: STREAM_QUALITY.to_string(),
            expires_at: Utc::now() + Duration::hours(STREAM_TTL_HOURS),
            is_preview: false,
            message: Some(STREAM_MESSAGE.to_string()),
        })
    }
}

fn format_track(track: Track) -> Song {
    let tags = track.musicinfo.unwrap_or_default().tags;
    let audio_url = if track.audio.is_empty() {
        track.audiodownload
    } else {
        track.audio
    };
    let cover = if track.image.is_empty() {
        non_empty_or(track.album_image, PLACEHOLDER_COVER)
    } else {
        track.image
    };

    Song {
        id: track.id,
        title: track.name,
        duration: track.duration,
        audio_url,
        cover,
        genre: first_or(tags.genres, "Unknown"),
        mood: first_or(tags.vartags, "Neutral"),
        play_count: track
            .stats
            .and_then(|s| s.rate)
            .map(|r| r.max(0.0) as u64)
            .unwrap_or(0),
        artist_id: track.artist_id,
        artist_name: track.artist_name,
        album_id: Some(track.album_id).filter(|id| !id.is_empty()),
        album_name: Some(track.album_name).filter(|name| !name.is_empty()),
        has_preview: false,
        is_full_song: true,
        external_url: track.shareurl,
        license: track.license_ccurl,
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn first_or(values: Vec<String>, fallback: &str) -> String {
    values
        .into_iter()
        .next()
        .unwrap_or_else(|| fallback.to_string())
}
