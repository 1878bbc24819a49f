//! Spotify Web API provider.
//!
//! Metadata comes from the Web API using the client-credentials flow. Audio
//! is limited to 30-second previews, and many tracks have none at all.

mod token;
mod types;

pub use token::{TokenCache, TokenGrant, RENEWAL_MARGIN};

use async_trait::async_trait;
use cadence_core::{
    dedup_genres, release_year, Album, AlbumSummary, Artist, ArtistRef, ArtistSummary,
    RecommendationContext, Recommendations, SearchFilters, Song, StreamInfo, StreamQuality,
};
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{require, SpotifyConfig};
use crate::error::{ProviderError, Result};
use crate::http;
use crate::provider::{log_lookup_failure, MusicProvider};
use types::{
    AlbumTrack, FullAlbum, FullArtist, Image, Paging, RelatedArtists, SearchResponse,
    SimpleAlbum, Track, TrackList, TokenResponse,
};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 50;
const PLAY_COUNT_PER_POPULARITY: u64 = 10_000;
const RELATED_ARTISTS: usize = 5;
const TOP_TRACKS_MARKET: &str = "US";
const ARTIST_ALBUMS_LIMIT: usize = 20;
const RECOMMENDATION_SEEDS: &str = "pop,rock,hip-hop";
const RECOMMENDATION_LIMIT: usize = 20;

const PREVIEW_QUALITY: &str = "96kbps";
const PREVIEW_MESSAGE: &str =
    "This is a 30-second preview. Full playback requires Spotify Premium.";

const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/300";
const PLACEHOLDER_ARTIST_IMAGE: &str = "https://via.placeholder.com/400";

pub struct SpotifyProvider {
    http: Client,
    api_url: Url,
    accounts_url: Url,
    client_id: String,
    client_secret: String,
    tokens: TokenCache,
}

impl SpotifyProvider {
    pub fn new(config: &SpotifyConfig) -> Result<Self> {
        let client_id = require(&config.client_id, "spotify", "client_id")?;
        let client_secret = require(&config.client_secret, "spotify", "client_secret")?;

        Ok(Self {
            http: http::build_client()?,
            api_url: http::parse_base_url(&config.api_url)?,
            accounts_url: http::parse_base_url(&config.accounts_url)?,
            client_id,
            client_secret,
            tokens: TokenCache::new(),
        })
    }

    async fn access_token(&self) -> Result<String> {
        self.tokens.get_or_renew(|| self.exchange_token()).await
    }

    async fn exchange_token(&self) -> Result<TokenGrant> {
        let url = http::endpoint(&self.accounts_url, &["api", "token"])?;

        let response = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthFailed(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid token response: {}", e)))?;

        info!(expires_in = token.expires_in, "Spotify access token renewed");

        Ok(TokenGrant {
            access_token: token.access_token,
            expires_in: Duration::from_secs(token.expires_in),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let token = self.access_token().await?;
        let url = http::endpoint(&self.api_url, segments)?;

        debug!(url = %url, "Spotify request");

        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        http::read_json(response).await
    }

    async fn fetch_search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Song>> {
        let limit = filters.effective_limit(DEFAULT_LIMIT);
        let request_limit = (limit * 2).min(MAX_LIMIT);

        let result: SearchResponse = self
            .get(
                &["search"],
                &[
                    ("q", search_query(query, filters)),
                    ("type", "track".to_string()),
                    ("limit", request_limit.to_string()),
                ],
            )
            .await?;

        let (mut songs, without_preview): (Vec<Song>, Vec<Song>) = result
            .tracks
            .items
            .into_iter()
            .map(format_track)
            .partition(|s| s.has_preview);
        songs.extend(without_preview);
        songs.truncate(limit);

        Ok(songs)
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        self.get(&["tracks", id], &[]).await
    }

    async fn fetch_artist(&self, id: &str) -> Result<Artist> {
        let (artist, top_tracks, albums) = tokio::try_join!(
            self.fetch_artist_record(id),
            self.fetch_top_tracks(id),
            self.fetch_artist_albums(id),
        )?;

        // Related artists are optional; a failed lookup leaves them empty
        let related: RelatedArtists = self
            .get(&["artists", id, "related-artists"], &[])
            .await
            .unwrap_or_else(|e| {
                log_lookup_failure("spotify", "related_artists", id, &e);
                RelatedArtists {
                    artists: Vec::new(),
                }
            });

        Ok(Artist {
            bio: format!(
                "{} - {} followers",
                artist.name,
                group_thousands(artist.followers.total)
            ),
            image: first_image(&artist.images, PLACEHOLDER_ARTIST_IMAGE),
            verified: true,
            top_tracks: top_tracks.tracks.into_iter().map(format_track).collect(),
            albums: albums
                .items
                .into_iter()
                .map(|album| AlbumSummary {
                    cover: first_image(&album.images, PLACEHOLDER_COVER),
                    release_year: release_year(&album.release_date),
                    artist_id: id.to_string(),
                    id: album.id,
                    title: album.name,
                })
                .collect(),
            related_artists: related
                .artists
                .into_iter()
                .take(RELATED_ARTISTS)
                .map(|a| ArtistSummary {
                    image: first_image(&a.images, PLACEHOLDER_ARTIST_IMAGE),
                    id: a.id,
                    name: a.name,
                    genres: a.genres,
                })
                .collect(),
            id: artist.id,
            name: artist.name,
            genres: dedup_genres(artist.genres),
        })
    }

    async fn fetch_artist_record(&self, id: &str) -> Result<FullArtist> {
        self.get(&["artists", id], &[]).await
    }

    async fn fetch_top_tracks(&self, id: &str) -> Result<TrackList> {
        self.get(
            &["artists", id, "top-tracks"],
            &[("market", TOP_TRACKS_MARKET.to_string())],
        )
        .await
    }

    async fn fetch_artist_albums(&self, id: &str) -> Result<Paging<SimpleAlbum>> {
        self.get(
            &["artists", id, "albums"],
            &[("limit", ARTIST_ALBUMS_LIMIT.to_string())],
        )
        .await
    }

    async fn fetch_album(&self, id: &str) -> Result<Album> {
        let album: FullAlbum = self.get(&["albums", id], &[]).await?;

        let cover = first_image(&album.images, PLACEHOLDER_COVER);
        let artist = album.artists.first().map(|a| ArtistRef {
            id: a.id.clone(),
            name: a.name.clone(),
        });

        let songs = album
            .tracks
            .items
            .into_iter()
            .map(|track| format_album_track(track, &album.id, &album.name, &cover))
            .collect();

        Ok(Album {
            artist_id: artist.as_ref().map(|a| a.id.clone()).unwrap_or_default(),
            release_year: release_year(&album.release_date),
            id: album.id,
            title: album.name,
            cover,
            artist,
            songs,
        })
    }

    async fn fetch_recommendations(&self) -> Result<Vec<Song>> {
        let result: TrackList = self
            .get(
                &["recommendations"],
                &[
                    ("seed_genres", RECOMMENDATION_SEEDS.to_string()),
                    ("limit", RECOMMENDATION_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(result.tracks.into_iter().map(format_track).collect())
    }
}

#[async_trait]
impl MusicProvider for SpotifyProvider {
    fn name(&self) -> &'static str {
        "spotify"
    }

    async fn search_songs(&self, query: &str, filters: &SearchFilters) -> Vec<Song> {
        match self.fetch_search(query, filters).await {
            Ok(songs) => songs,
            Err(e) => {
                warn!(provider = "spotify", query, error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    async fn get_song(&self, id: &str) -> Option<Song> {
        match self.fetch_track(id).await {
            Ok(track) => Some(format_track(track)),
            Err(e) => {
                log_lookup_failure("spotify", "get_song", id, &e);
                None
            }
        }
    }

    async fn get_artist(&self, id: &str) -> Option<Artist> {
        self.fetch_artist(id)
            .await
            .map_err(|e| log_lookup_failure("spotify", "get_artist", id, &e))
            .ok()
    }

    async fn get_album(&self, id: &str) -> Option<Album> {
        self.fetch_album(id)
            .await
            .map_err(|e| log_lookup_failure("spotify", "get_album", id, &e))
            .ok()
    }

    async fn get_recommendations(
        &self,
        user_id: &str,
        _context: &RecommendationContext,
    ) -> Recommendations {
        match self.fetch_recommendations().await {
            Ok(tracks) => Recommendations {
                daily_mix: tracks.clone(),
                discover_weekly: tracks.clone(),
                because_you_listened: tracks,
            },
            Err(e) => {
                warn!(provider = "spotify", user_id, error = %e, "Recommendations failed");
                Recommendations::default()
            }
        }
    }

    async fn get_stream_url(&self, song_id: &str, _quality: StreamQuality) -> Option<StreamInfo> {
        let track = self
            .fetch_track(song_id)
            .await
            .map_err(|e| log_lookup_failure("spotify", "get_stream_url", song_id, &e))
            .ok()?;

        Some(StreamInfo {
            url: track.preview_url.unwrap_or_default(),
            quality: PREVIEW_QUALITY.to_string(),
            expires_at: Utc::now() + ChronoDuration::hours(1),
            is_preview: true,
            message: Some(PREVIEW_MESSAGE.to_string()),
        })
    }
}

/// Build the search string with Spotify field qualifiers.
///
/// Spotify has no mood qualifier, so a mood filter is ignored.
fn search_query(query: &str, filters: &SearchFilters) -> String {
    let mut q = match query.trim() {
        "" => "*".to_string(),
        trimmed => trimmed.to_string(),
    };
    if let Some(genre) = &filters.genre {
        q.push_str(&format!(" genre:{}", genre.to_lowercase()));
    }
    if let Some(artist_id) = &filters.artist_id {
        q.push_str(&format!(" artist:{}", artist_id));
    }
    if let Some(year) = filters.year {
        q.push_str(&format!(" year:{}", year));
    }
    q
}

fn format_track(track: Track) -> Song {
    let preview = track.preview_url.filter(|url| !url.is_empty());
    let artist = track.artists.into_iter().next();
    let (cover, genre, album_id, album_name) = match track.album {
        Some(album) => (
            first_image(&album.images, PLACEHOLDER_COVER),
            album.genres.into_iter().next(),
            Some(album.id),
            Some(album.name),
        ),
        None => (PLACEHOLDER_COVER.to_string(), None, None, None),
    };

    Song {
        mood: infer_mood(&track.name).to_string(),
        id: track.id,
        title: track.name,
        duration: (track.duration_ms / 1000) as u32,
        has_preview: preview.is_some(),
        audio_url: preview.unwrap_or_default(),
        cover,
        genre: genre.unwrap_or_else(|| "Unknown".to_string()),
        play_count: u64::from(track.popularity) * PLAY_COUNT_PER_POPULARITY,
        artist_id: artist.as_ref().map(|a| a.id.clone()).unwrap_or_default(),
        artist_name: artist.map(|a| a.name).unwrap_or_default(),
        album_id,
        album_name,
        is_full_song: false,
        external_url: track.external_urls.spotify,
        license: None,
    }
}

fn format_album_track(track: AlbumTrack, album_id: &str, album_name: &str, cover: &str) -> Song {
    let preview = track.preview_url.filter(|url| !url.is_empty());
    let artist = track.artists.into_iter().next();

    Song {
        mood: infer_mood(&track.name).to_string(),
        id: track.id,
        title: track.name,
        duration: (track.duration_ms / 1000) as u32,
        has_preview: preview.is_some(),
        audio_url: preview.unwrap_or_default(),
        cover: cover.to_string(),
        genre: "Unknown".to_string(),
        play_count: 0,
        artist_id: artist.as_ref().map(|a| a.id.clone()).unwrap_or_default(),
        artist_name: artist.map(|a| a.name).unwrap_or_default(),
        album_id: Some(album_id.to_string()),
        album_name: Some(album_name.to_string()),
        is_full_song: false,
        external_url: track.external_urls.spotify,
        license: None,
    }
}

fn first_image(images: &[Image], fallback: &str) -> String {
    images
        .first()
        .map(|i| i.url.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// Guess a mood from title keywords.
pub fn infer_mood(title: &str) -> &'static str {
    const KEYWORDS: [(&[&str], &str); 5] = [
        (&["happy", "joy"], "Happy"),
        (&["sad", "blue"], "Sad"),
        (&["energy", "party"], "Energetic"),
        (&["chill", "relax"], "Chill"),
        (&["love", "heart"], "Romantic"),
    ];

    let title = title.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| title.contains(w)))
        .map(|(_, mood)| *mood)
        .unwrap_or("Neutral")
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
