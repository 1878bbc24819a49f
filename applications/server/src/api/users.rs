/// Current-user API routes: profile, library, activity, follows
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cadence_core::{Activity, ActivityKind, Playlist, Song, User};
use cadence_storage::{
    activity, follows, likes, playlists,
    users::{self, UpdateProfile},
};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

/// A liked song resolved through the provider
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedSongResponse {
    #[serde(flatten)]
    pub song: Song,
    pub liked_at: DateTime<Utc>,
}

/// GET /api/users/me
pub async fn get_me(auth: AuthenticatedUser) -> Json<User> {
    Json(auth.0)
}

/// PATCH /api/users/me
pub async fn update_me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let update = UpdateProfile {
        display_name: req
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        avatar: req.avatar,
    };

    let user = users::update_profile(app_state.db.pool(), auth.user_id(), update).await?;
    Ok(Json(user))
}

/// GET /api/users/me/playlists
pub async fn my_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = playlists::list_by_owner(app_state.db.pool(), auth.user_id()).await?;
    Ok(Json(playlists))
}

/// GET /api/users/me/liked-songs
///
/// Songs the provider no longer knows are left out.
pub async fn liked_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<LikedSongResponse>>> {
    let liked = likes::list(app_state.db.pool(), auth.user_id()).await?;

    let lookups = liked.into_iter().map(|entry| {
        let provider = &app_state.provider;
        async move {
            let song = provider.get_song(&entry.song_id).await;
            if song.is_none() {
                tracing::debug!(song = %entry.song_id, "Liked song no longer resolvable");
            }
            song.map(|song| LikedSongResponse {
                song,
                liked_at: entry.liked_at,
            })
        }
    });

    let songs = join_all(lookups).await.into_iter().flatten().collect();
    Ok(Json(songs))
}

/// POST /api/users/me/liked-songs/:songId
pub async fn like_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(song_id): Path<String>,
) -> Result<(StatusCode, Json<Value>)> {
    let pool = app_state.db.pool();
    likes::like(pool, auth.user_id(), &song_id).await?;
    activity::record(
        pool,
        auth.user_id(),
        ActivityKind::LikedSong,
        json!({ "songId": song_id }),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "Song liked" }))))
}

/// DELETE /api/users/me/liked-songs/:songId
pub async fn unlike_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(song_id): Path<String>,
) -> Result<Json<Value>> {
    likes::unlike(app_state.db.pool(), auth.user_id(), &song_id).await?;
    Ok(Json(json!({ "message": "Song unliked" })))
}

/// GET /api/users/me/activity
pub async fn my_activity(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Activity>>> {
    let feed = activity::list_recent(app_state.db.pool(), auth.user_id()).await?;
    Ok(Json(feed))
}

/// POST /api/users/follow/artist/:artistId
pub async fn follow_artist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(artist_id): Path<String>,
) -> Result<(StatusCode, Json<Value>)> {
    let pool = app_state.db.pool();
    follows::follow(pool, auth.user_id(), &artist_id).await?;
    activity::record(
        pool,
        auth.user_id(),
        ActivityKind::FollowedArtist,
        json!({ "artistId": artist_id }),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "Artist followed" }))))
}

/// DELETE /api/users/follow/artist/:artistId
pub async fn unfollow_artist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(artist_id): Path<String>,
) -> Result<Json<Value>> {
    follows::unfollow(app_state.db.pool(), auth.user_id(), &artist_id).await?;
    Ok(Json(json!({ "message": "Unfollowed artist" })))
}
