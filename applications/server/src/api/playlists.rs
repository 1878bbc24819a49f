/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cadence_core::{ActivityKind, CreatePlaylist, Playlist, PlaylistId, PlaylistSong, UpdatePlaylist};
use cadence_storage::{activity, playlists};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    pub song_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub song_ids: Vec<String>,
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest("Playlist name is required".to_string()));
    }

    let pool = app_state.db.pool();
    let playlist = playlists::create(
        pool,
        CreatePlaylist {
            owner_id: auth.user_id().clone(),
            name: req.name,
            description: req.description,
            is_public: req.is_public,
        },
    )
    .await?;

    activity::record(
        pool,
        auth.user_id(),
        ActivityKind::CreatedPlaylist,
        json!({ "playlistId": playlist.id }),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
/// Public playlists are readable by anyone, private ones by their owner only
pub async fn get_playlist(
    State(app_state): State<AppState>,
    auth: Option<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<Playlist>> {
    let playlist = playlists::get(app_state.db.pool(), &PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !playlist.is_visible_to(auth.as_ref().map(AuthenticatedUser::user_id)) {
        return Err(ServerError::Forbidden("Private playlist".to_string()));
    }

    Ok(Json(playlist))
}

/// PATCH /api/playlists/:id
pub async fn update_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(update): Json<UpdatePlaylist>,
) -> Result<Json<Playlist>> {
    if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ServerError::BadRequest("Playlist name cannot be empty".to_string()));
    }

    let playlist = playlists::update(
        app_state.db.pool(),
        &PlaylistId::new(id),
        auth.user_id(),
        update,
    )
    .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    playlists::delete(app_state.db.pool(), &PlaylistId::new(id), auth.user_id()).await?;
    Ok(Json(json!({ "message": "Playlist deleted" })))
}

/// POST /api/playlists/:id/songs
pub async fn add_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<AddSongRequest>,
) -> Result<(StatusCode, Json<PlaylistSong>)> {
    let entry = playlists::add_song(
        app_state.db.pool(),
        &PlaylistId::new(id),
        auth.user_id(),
        &req.song_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/playlists/:id/songs/:songId
pub async fn remove_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, song_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    playlists::remove_song(
        app_state.db.pool(),
        &PlaylistId::new(id),
        auth.user_id(),
        &song_id,
    )
    .await?;
    Ok(Json(json!({ "message": "Song removed from playlist" })))
}

/// PUT /api/playlists/:id/reorder
pub async fn reorder_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<PlaylistSong>>> {
    let songs = playlists::reorder(
        app_state.db.pool(),
        &PlaylistId::new(id),
        auth.user_id(),
        &req.song_ids,
    )
    .await?;
    Ok(Json(songs))
}
