//! Recommendation heuristics on top of the music provider
//!
//! Everything here degrades to generic provider results instead of failing:
//! a storage error while reading listening history is logged and the caller
//! gets the guest shelves.

use cadence_core::{RecommendationContext, Recommendations, SearchFilters, Song, UserId};
use cadence_providers::MusicProvider;
use cadence_storage::{activity, likes, Database};
use chrono::{Duration, Utc};
use futures_util::future::join_all;
use rand::seq::SliceRandom;
use std::sync::Arc;

const SHELF_SIZE: usize = 10;
const HISTORY_DEPTH: i64 = 20;
const CONTEXT_SEEDS: usize = 5;
const MOOD_LIMIT: usize = 30;
const SIMILAR_LIMIT: usize = 20;
const TRENDING_WINDOW_DAYS: i64 = 7;

/// Genre searched for a listener mood; unknown moods fall back to pop
pub fn genre_for_mood(mood: &str) -> &'static str {
    match mood.to_lowercase().as_str() {
        "sad" => "acoustic",
        "energetic" => "electronic",
        "chill" => "ambient",
        "romantic" => "jazz",
        "focus" => "classical",
        "workout" => "rock",
        "party" => "dance",
        _ => "pop",
    }
}

pub struct RecommendationService {
    provider: Arc<dyn MusicProvider>,
    db: Database,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn MusicProvider>, db: Database) -> Self {
        Self { provider, db }
    }

    /// Provider recommendations without listening context
    pub async fn for_you(&self, user_id: Option<&UserId>) -> Recommendations {
        let user = user_id.map_or("guest", UserId::as_str);
        self.provider
            .get_recommendations(user, &RecommendationContext::default())
            .await
    }

    /// Shelves seeded by the listener's recent plays and likes
    pub async fn personalized(&self, user_id: Option<&UserId>) -> Recommendations {
        let Some(user_id) = user_id else {
            return self.generic().await;
        };

        let seeds = match self.history(user_id).await {
            Ok(seeds) => seeds,
            Err(e) => {
                tracing::warn!(user = %user_id, error = %e, "Listening history unavailable");
                return self.generic().await;
            }
        };
        if seeds.is_empty() {
            return self.generic().await;
        }

        let context = RecommendationContext {
            recent_song_ids: seeds.into_iter().take(CONTEXT_SEEDS).collect(),
        };
        self.provider
            .get_recommendations(user_id.as_str(), &context)
            .await
    }

    /// Recent plays then recent likes, without repeats
    async fn history(&self, user_id: &UserId) -> cadence_storage::Result<Vec<String>> {
        let pool = self.db.pool();
        let played = activity::recent_played_song_ids(pool, user_id, HISTORY_DEPTH).await?;
        let liked = likes::recent_song_ids(pool, user_id, HISTORY_DEPTH).await?;

        let mut seeds: Vec<String> = Vec::with_capacity(played.len() + liked.len());
        for id in played.into_iter().chain(liked) {
            if !seeds.contains(&id) {
                seeds.push(id);
            }
        }
        Ok(seeds)
    }

    /// Three shelves cut from one unfiltered search
    async fn generic(&self) -> Recommendations {
        let songs = self
            .provider
            .search_songs("", &SearchFilters::limit(SHELF_SIZE * 3))
            .await;
        Recommendations::from_slices(&songs, SHELF_SIZE)
    }

    pub async fn by_mood(&self, mood: &str) -> Vec<Song> {
        let filters = SearchFilters::genre(genre_for_mood(mood), MOOD_LIMIT);
        self.provider.search_songs("", &filters).await
    }

    /// Songs sharing the seed's genre, seed excluded. Unknown seed → empty.
    pub async fn similar(&self, song_id: &str) -> Vec<Song> {
        let Some(seed) = self.provider.get_song(song_id).await else {
            return Vec::new();
        };

        let filters = SearchFilters::genre(seed.genre, SIMILAR_LIMIT);
        let mut songs = self.provider.search_songs("", &filters).await;
        songs.retain(|s| s.id != song_id);
        songs
    }

    /// Most played songs of the last week, falling back to a provider search
    /// when nothing was played or history is unavailable
    pub async fn trending(&self, limit: usize) -> Vec<Song> {
        let since = Utc::now() - Duration::days(TRENDING_WINDOW_DAYS);

        match activity::trending_song_ids(self.db.pool(), since, limit as i64).await {
            Ok(ranked) if !ranked.is_empty() => {
                let lookups = ranked.iter().map(|(id, _)| self.provider.get_song(id));
                join_all(lookups).await.into_iter().flatten().collect()
            }
            Ok(_) => self.popular(limit).await,
            Err(e) => {
                tracing::warn!(error = %e, "Trending query failed, using provider results");
                self.popular(limit).await
            }
        }
    }

    async fn popular(&self, limit: usize) -> Vec<Song> {
        self.provider
            .search_songs("", &SearchFilters::limit(limit))
            .await
    }

    /// Endless-play list: the seed's genre in random order
    pub async fn radio(&self, song_id: &str, limit: usize) -> Vec<Song> {
        let Some(seed) = self.provider.get_song(song_id).await else {
            return Vec::new();
        };

        let filters = SearchFilters::genre(seed.genre, limit);
        let mut songs = self.provider.search_songs("", &filters).await;
        songs.shuffle(&mut rand::thread_rng());
        songs
    }
}
