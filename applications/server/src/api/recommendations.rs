/// Recommendation API routes
use crate::{middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cadence_core::{Recommendations, Song, MAX_SEARCH_LIMIT};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    fn or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).min(MAX_SEARCH_LIMIT)
    }
}

/// GET /api/recommendations/for-you
pub async fn for_you(
    State(app_state): State<AppState>,
    auth: Option<AuthenticatedUser>,
) -> Json<Recommendations> {
    let user_id = auth.as_ref().map(AuthenticatedUser::user_id);
    Json(app_state.recommendations.for_you(user_id).await)
}

/// GET /api/recommendations
pub async fn personalized(
    State(app_state): State<AppState>,
    auth: Option<AuthenticatedUser>,
) -> Json<Recommendations> {
    let user_id = auth.as_ref().map(AuthenticatedUser::user_id);
    Json(app_state.recommendations.personalized(user_id).await)
}

/// GET /api/recommendations/mood/:mood
pub async fn by_mood(
    State(app_state): State<AppState>,
    Path(mood): Path<String>,
) -> Json<Vec<Song>> {
    Json(app_state.recommendations.by_mood(&mood).await)
}

/// GET /api/recommendations/similar/:songId
pub async fn similar(
    State(app_state): State<AppState>,
    Path(song_id): Path<String>,
) -> Json<Vec<Song>> {
    Json(app_state.recommendations.similar(&song_id).await)
}

/// GET /api/recommendations/trending
pub async fn trending(
    State(app_state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Song>> {
    Json(app_state.recommendations.trending(query.or(20)).await)
}

/// GET /api/recommendations/radio/:songId
pub async fn radio(
    State(app_state): State<AppState>,
    Path(song_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Song>> {
    Json(app_state.recommendations.radio(&song_id, query.or(50)).await)
}
