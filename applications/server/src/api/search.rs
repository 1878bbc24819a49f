/// Search API routes
use crate::{
    error::{Result, ServerError},
    services::cache::ttl,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use cadence_core::{SearchFilters, Song};
use serde::{Deserialize, Serialize};

const DEFAULT_SEARCH_LIMIT: usize = 50;
const SUGGESTION_LIMIT: usize = 5;
const SUGGESTION_MIN_CHARS: usize = 2;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub mood: Option<String>,
    pub artist_id: Option<String>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    fn text(&self) -> &str {
        self.q.as_deref().map_or("", str::trim)
    }

    fn filters(&self) -> SearchFilters {
        SearchFilters {
            genre: non_empty(&self.genre),
            year: self.year,
            artist_id: non_empty(&self.artist_id),
            mood: non_empty(&self.mood),
            limit: Some(self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<Song> for Suggestion {
    fn from(song: Song) -> Self {
        let artist = if song.artist_name.is_empty() {
            song.artist_id
        } else {
            song.artist_name
        };
        Self {
            id: song.id,
            title: song.title,
            artist,
            kind: "song".to_string(),
        }
    }
}

/// GET /api/search
pub async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Song>>> {
    let filters = query.filters();
    if query.text().is_empty() && filters.is_unfiltered() {
        return Err(ServerError::BadRequest(
            "At least one search parameter required".to_string(),
        ));
    }

    let key = format!(
        "search:{}",
        serde_json::to_string(&query).unwrap_or_default()
    );
    let songs = app_state
        .cache
        .get_or_fetch(key, ttl::SEARCH, || async {
            Some(app_state.provider.search_songs(query.text(), &filters).await)
        })
        .await
        .unwrap_or_default();

    Ok(Json(songs))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub q: Option<String>,
}

/// GET /api/search/suggestions
pub async fn suggestions(
    State(app_state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<Vec<Suggestion>> {
    let q = query.q.as_deref().unwrap_or("").trim();
    if q.chars().count() < SUGGESTION_MIN_CHARS {
        return Json(Vec::new());
    }

    let suggestions = app_state
        .cache
        .get_or_fetch(format!("suggestions:{}", q), ttl::SEARCH, || async {
            let songs = app_state
                .provider
                .search_songs(q, &SearchFilters::limit(SUGGESTION_LIMIT))
                .await;
            Some(songs.into_iter().map(Suggestion::from).collect::<Vec<_>>())
        })
        .await
        .unwrap_or_default();

    Json(suggestions)
}
