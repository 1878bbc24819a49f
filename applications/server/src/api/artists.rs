/// Artist and album API routes
use crate::{
    error::{Result, ServerError},
    services::cache::ttl,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use cadence_core::{Album, AlbumSummary, Artist, ArtistSummary, Song};

/// Cached artist lookup shared by the artist routes
async fn load_artist(app_state: &AppState, id: &str) -> Result<Artist> {
    app_state
        .cache
        .get_or_fetch(format!("artist:{}", id), ttl::ARTISTS, || {
            app_state.provider.get_artist(id)
        })
        .await
        .ok_or_else(|| ServerError::NotFound("Artist not found".to_string()))
}

/// GET /api/artists/:id
pub async fn get_artist(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artist>> {
    load_artist(&app_state, &id).await.map(Json)
}

/// GET /api/artists/:id/albums
pub async fn get_artist_albums(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AlbumSummary>>> {
    let artist = load_artist(&app_state, &id).await?;
    Ok(Json(artist.albums))
}

/// GET /api/artists/:id/top-tracks
pub async fn get_artist_top_tracks(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Song>>> {
    let artist = load_artist(&app_state, &id).await?;
    Ok(Json(artist.top_tracks))
}

/// GET /api/artists/:id/related
pub async fn get_related_artists(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ArtistSummary>>> {
    let artist = load_artist(&app_state, &id).await?;
    Ok(Json(artist.related_artists))
}

/// GET /api/albums/:id
pub async fn get_album(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Album>> {
    app_state
        .cache
        .get_or_fetch(format!("album:{}", id), ttl::ARTISTS, || {
            app_state.provider.get_album(&id)
        })
        .await
        .map(Json)
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))
}
