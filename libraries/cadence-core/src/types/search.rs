//! Search and recommendation query types

use super::song::Song;
use serde::{Deserialize, Serialize};

/// Hard cap on songs returned by a single search
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Optional, independently combinable search filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub artist_id: Option<String>,
    pub mood: Option<String>,
    pub limit: Option<usize>,
}

impl SearchFilters {
    /// Filters restricted to one genre
    pub fn genre(genre: impl Into<String>, limit: usize) -> Self {
        Self {
            genre: Some(genre.into()),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Filters with only a result cap
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Requested limit (or `default`), never above `MAX_SEARCH_LIMIT`
    pub fn effective_limit(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).min(MAX_SEARCH_LIMIT)
    }

    /// True when no narrowing filter is set (limit does not count)
    pub fn is_unfiltered(&self) -> bool {
        self.genre.is_none() && self.year.is_none() && self.artist_id.is_none() && self.mood.is_none()
    }
}

/// Listening context handed to providers when asking for recommendations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    pub recent_song_ids: Vec<String>,
}

/// Three recommendation shelves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub daily_mix: Vec<Song>,
    pub discover_weekly: Vec<Song>,
    pub because_you_listened: Vec<Song>,
}

impl Recommendations {
    /// Split one list into three consecutive shelves of `shelf_size`
    pub fn from_slices(songs: &[Song], shelf_size: usize) -> Self {
        let shelf = |n: usize| -> Vec<Song> {
            songs
                .iter()
                .skip(n * shelf_size)
                .take(shelf_size)
                .cloned()
                .collect()
        };
        Self {
            daily_mix: shelf(0),
            discover_weekly: shelf(1),
            because_you_listened: shelf(2),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.daily_mix.is_empty()
            && self.discover_weekly.is_empty()
            && self.because_you_listened.is_empty()
    }
}
