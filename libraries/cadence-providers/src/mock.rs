//! Generated in-memory catalogue for development and tests.

use async_trait::async_trait;
use cadence_core::{
    Album, AlbumSummary, Artist, ArtistRef, RecommendationContext, Recommendations,
    SearchFilters, Song, StreamInfo, StreamQuality, MAX_SEARCH_LIMIT,
};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::provider::MusicProvider;

pub const GENRES: [&str; 6] = ["Pop", "Rock", "Hip Hop", "Electronic", "Jazz", "Classical"];
pub const MOODS: [&str; 5] = ["Happy", "Sad", "Energetic", "Chill", "Romantic"];

const ARTIST_COUNT: usize = 20;
const ALBUM_COUNT: usize = 30;
const SONG_COUNT: usize = 100;
const VERIFIED_ARTISTS: usize = 10;
const MAX_PLAY_COUNT: u64 = 1_000_000;

const TOP_TRACKS: usize = 10;
const RELATED_ARTISTS: usize = 5;
const SHELF_SIZE: usize = 20;

/// Provider backed by a deterministic generated catalogue.
///
/// Ids, titles, genres and moods are fixed. Only play counts are random, and
/// `with_seed` makes those reproducible too.
pub struct MockProvider {
    artists: Vec<Artist>,
    albums: Vec<AlbumSummary>,
    songs: Vec<Song>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::generate(&mut StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::generate(&mut StdRng::seed_from_u64(seed))
    }

    fn generate<R: Rng>(rng: &mut R) -> Self {
        let artists: Vec<Artist> = (0..ARTIST_COUNT)
            .map(|i| Artist {
                id: format!("artist-{}", i + 1),
                name: format!("Artist {}", i + 1),
                bio: format!("Biography of Artist {}", i + 1),
                image: format!("https://picsum.photos/seed/artist{}/400/400", i),
                genres: vec![GENRES[i % GENRES.len()].to_string()],
                verified: i < VERIFIED_ARTISTS,
                top_tracks: Vec::new(),
                albums: Vec::new(),
                related_artists: Vec::new(),
            })
            .collect();

        let albums: Vec<AlbumSummary> = (0..ALBUM_COUNT)
            .map(|i| AlbumSummary {
                id: format!("album-{}", i + 1),
                title: format!("Album {}", i + 1),
                cover: format!("https://picsum.photos/seed/album{}/300/300", i),
                release_year: Some(2020 + (i % 4) as i32),
                artist_id: artists[i % ARTIST_COUNT].id.clone(),
            })
            .collect();

        let songs: Vec<Song> = (0..SONG_COUNT)
            .map(|i| {
                let artist = &artists[i % ARTIST_COUNT];
                let album = &albums[i % ALBUM_COUNT];
                Song {
                    id: format!("song-{}", i + 1),
                    title: format!("Song {}", i + 1),
                    duration: 180 + (i % 120) as u32,
                    audio_url: format!("https://example.com/audio/song-{}.mp3", i + 1),
                    cover: album.cover.clone(),
                    genre: GENRES[i % GENRES.len()].to_string(),
                    mood: MOODS[i % MOODS.len()].to_string(),
                    play_count: rng.gen_range(0..MAX_PLAY_COUNT),
                    artist_id: artist.id.clone(),
                    artist_name: artist.name.clone(),
                    album_id: Some(album.id.clone()),
                    album_name: Some(album.title.clone()),
                    has_preview: false,
                    is_full_song: true,
                    external_url: None,
                    license: None,
                }
            })
            .collect();

        Self {
            artists,
            albums,
            songs,
        }
    }

    fn album_years(&self, year: i32) -> Vec<&str> {
        self.albums
            .iter()
            .filter(|a| a.release_year == Some(year))
            .map(|a| a.id.as_str())
            .collect()
    }

    fn matches(&self, song: &Song, query: &str, filters: &SearchFilters, years: &[&str]) -> bool {
        if !query.is_empty() && !song.title.to_lowercase().contains(query) {
            return false;
        }
        if let Some(genre) = &filters.genre {
            if !song.genre.eq_ignore_ascii_case(genre) {
                return false;
            }
        }
        if let Some(artist_id) = &filters.artist_id {
            if &song.artist_id != artist_id {
                return false;
            }
        }
        if filters.year.is_some()
            && !song
                .album_id
                .as_deref()
                .is_some_and(|id| years.contains(&id))
        {
            return false;
        }
        if let Some(mood) = &filters.mood {
            if !song.mood.eq_ignore_ascii_case(mood) {
                return false;
            }
        }
        true
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MusicProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search_songs(&self, query: &str, filters: &SearchFilters) -> Vec<Song> {
        let query = query.trim().to_lowercase();
        let years = filters.year.map(|y| self.album_years(y)).unwrap_or_default();
        let limit = filters.effective_limit(MAX_SEARCH_LIMIT);

        let results: Vec<Song> = self
            .songs
            .iter()
            .filter(|song| self.matches(song, &query, filters, &years))
            .take(limit)
            .cloned()
            .collect();

        debug!(query = %query, results = results.len(), "Mock search");
        results
    }

    async fn get_song(&self, id: &str) -> Option<Song> {
        self.songs.iter().find(|s| s.id == id).cloned()
    }

    async fn get_artist(&self, id: &str) -> Option<Artist> {
        let artist = self.artists.iter().find(|a| a.id == id)?;

        let mut top_tracks: Vec<Song> = self
            .songs
            .iter()
            .filter(|s| s.artist_id == id)
            .cloned()
            .collect();
        top_tracks.sort_by(|a, b| b.play_count.cmp(&a.play_count));
        top_tracks.truncate(TOP_TRACKS);

        let albums = self
            .albums
            .iter()
            .filter(|a| a.artist_id == id)
            .cloned()
            .collect();

        let related_artists = self
            .artists
            .iter()
            .filter(|other| other.id != id && other.shares_genre_with(artist))
            .take(RELATED_ARTISTS)
            .map(Artist::summary)
            .collect();

        Some(Artist {
            top_tracks,
            albums,
            related_artists,
            ..artist.clone()
        })
    }

    async fn get_album(&self, id: &str) -> Option<Album> {
        let album = self.albums.iter().find(|a| a.id == id)?;

        let songs = self
            .songs
            .iter()
            .filter(|s| s.album_id.as_deref() == Some(id))
            .cloned()
            .collect();

        let artist = self
            .artists
            .iter()
            .find(|a| a.id == album.artist_id)
            .map(|a| ArtistRef {
                id: a.id.clone(),
                name: a.name.clone(),
            });

        Some(Album {
            id: album.id.clone(),
            title: album.title.clone(),
            cover: album.cover.clone(),
            release_year: album.release_year,
            artist_id: album.artist_id.clone(),
            artist,
            songs,
        })
    }

    async fn get_recommendations(
        &self,
        user_id: &str,
        _context: &RecommendationContext,
    ) -> Recommendations {
        let mut shuffled = self.songs.clone();
        shuffled.shuffle(&mut rand::thread_rng());

        debug!(user_id, "Mock recommendations");
        Recommendations::from_slices(&shuffled, SHELF_SIZE)
    }

    async fn get_stream_url(&self, song_id: &str, quality: StreamQuality) -> Option<StreamInfo> {
        let song = self.songs.iter().find(|s| s.id == song_id)?;

        let label = match quality {
            StreamQuality::Low => "128kbps",
            StreamQuality::Standard => "192kbps",
            StreamQuality::High => "320kbps",
        };

        Some(StreamInfo {
            url: song.audio_url.clone(),
            quality: label.to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            is_preview: false,
            message: None,
        })
    }
}
