/// Song API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::cache::ttl,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cadence_core::{ActivityKind, SearchFilters, Song, StreamInfo, StreamQuality};
use cadence_storage::{activity, downloads};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ListSongsQuery {
    pub genre: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    Query(query): Query<ListSongsQuery>,
) -> Json<Vec<Song>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let key = format!(
        "songs:{}:{}",
        query.genre.as_deref().unwrap_or("all"),
        limit
    );

    let filters = SearchFilters {
        genre: query.genre,
        limit: Some(limit),
        ..Default::default()
    };

    let songs = app_state
        .cache
        .get_or_fetch(key, ttl::SONGS, || async {
            Some(app_state.provider.search_songs("", &filters).await)
        })
        .await
        .unwrap_or_default();

    Json(songs)
}

/// GET /api/songs/:id
pub async fn get_song(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Song>> {
    app_state
        .cache
        .get_or_fetch(format!("song:{}", id), ttl::SONGS, || {
            app_state.provider.get_song(&id)
        })
        .await
        .map(Json)
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))
}

/// GET /api/songs/:id/stream
///
/// Premium listeners get `high` quality, everyone else `standard`. Every
/// resolved stream is recorded as a play.
pub async fn stream_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<StreamInfo>> {
    let quality = if auth.user().is_premium() {
        StreamQuality::High
    } else {
        StreamQuality::Standard
    };

    let stream = app_state
        .provider
        .get_stream_url(&id, quality)
        .await
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    activity::record(
        app_state.db.pool(),
        auth.user_id(),
        ActivityKind::PlayedSong,
        json!({ "songId": id }),
    )
    .await?;

    Ok(Json(stream))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_token: String,
    pub expires_at: DateTime<Utc>,
    pub song: Song,
}

/// POST /api/songs/:id/download
///
/// Premium only. Grants a signed 30-day download token; asking again for the
/// same song replaces the earlier grant.
pub async fn download_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<DownloadResponse>> {
    if !auth.user().is_premium() {
        return Err(ServerError::Forbidden(
            "Premium subscription required".to_string(),
        ));
    }

    let song = app_state
        .provider
        .get_song(&id)
        .await
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    let (token, expires_at) = app_state
        .auth_service
        .create_download_token(auth.user_id(), &id)?;
    let grant = downloads::record(app_state.db.pool(), auth.user_id(), &id, &token, expires_at)
        .await?;

    tracing::debug!(user = %auth.user_id(), song = %id, "Download granted");

    Ok(Json(DownloadResponse {
        download_token: grant.token,
        expires_at: grant.expires_at,
        song,
    }))
}
