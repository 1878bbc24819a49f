//! Playlists and their ordered song entries
//!
//! Every mutation takes the acting user and fails with `PermissionDenied`
//! unless that user owns the playlist.

use crate::{Result, StorageError};
use cadence_core::{CreatePlaylist, Playlist, PlaylistId, PlaylistSong, UpdatePlaylist, UserId};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub const DEFAULT_COVER: &str = "https://picsum.photos/seed/playlist/300/300";

const PLAYLIST_COLUMNS: &str =
    "id, owner_id, name, description, is_public, cover, created_at, updated_at";

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_public: row.try_get("is_public")?,
        cover: row.try_get("cover")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        songs: None,
    })
}

pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO playlists (id, owner_id, name, description, is_public, cover, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&playlist.owner_id)
    .bind(playlist.name.trim())
    .bind(&playlist.description)
    .bind(playlist.is_public)
    .bind(DEFAULT_COVER)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find(pool, &id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))
}

/// Playlist row without songs
async fn find(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Load a playlist the caller may modify.
async fn find_owned(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<Playlist> {
    let playlist = find(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))?;

    if !playlist.is_owned_by(user_id) {
        return Err(StorageError::PermissionDenied(format!(
            "playlist {} belongs to another user",
            id
        )));
    }
    Ok(playlist)
}

/// Playlist with its songs in position order
pub async fn get(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let Some(mut playlist) = find(pool, id).await? else {
        return Ok(None);
    };
    playlist.songs = Some(get_songs(pool, id).await?);
    Ok(Some(playlist))
}

pub async fn get_songs(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<PlaylistSong>> {
    let rows = sqlx::query(
        "SELECT song_id, position, added_at FROM playlist_songs
         WHERE playlist_id = ?
         ORDER BY position ASC, added_at ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(PlaylistSong {
                song_id: row.try_get("song_id")?,
                position: row.try_get("position")?,
                added_at: row.try_get("added_at")?,
            })
        })
        .collect()
}

pub async fn list_by_owner(pool: &SqlitePool, owner_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = ? ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(playlist_from_row).collect()
}

pub async fn update(
    pool: &SqlitePool,
    id: &PlaylistId,
    user_id: &UserId,
    update: UpdatePlaylist,
) -> Result<Playlist> {
    find_owned(pool, id, user_id).await?;

    sqlx::query(
        "UPDATE playlists
         SET name = COALESCE(?, name),
             description = COALESCE(?, description),
             is_public = COALESCE(?, is_public),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(update.name.as_deref().map(str::trim))
    .bind(update.description)
    .bind(update.is_public)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))
}

/// Delete a playlist; its song entries go with it.
pub async fn delete(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<()> {
    find_owned(pool, id, user_id).await?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Append a song after the current last position.
pub async fn add_song(
    pool: &SqlitePool,
    id: &PlaylistId,
    user_id: &UserId,
    song_id: &str,
) -> Result<PlaylistSong> {
    find_owned(pool, id, user_id).await?;

    let mut tx = pool.begin().await?;

    let position: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM playlist_songs WHERE playlist_id = ?",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let added_at = Utc::now();
    sqlx::query(
        "INSERT INTO playlist_songs (playlist_id, song_id, position, added_at) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(song_id)
    .bind(position)
    .bind(added_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| StorageError::on_conflict(e, "Song already in playlist"))?;

    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(added_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(PlaylistSong {
        song_id: song_id.to_string(),
        position,
        added_at,
    })
}

/// Remove a song. Removing a song that is not there is not an error.
pub async fn remove_song(
    pool: &SqlitePool,
    id: &PlaylistId,
    user_id: &UserId,
    song_id: &str,
) -> Result<bool> {
    find_owned(pool, id, user_id).await?;

    let result = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(id)
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Give the listed songs positions 1..n in the given order.
///
/// Ids not in the playlist are skipped; unlisted songs keep their position.
pub async fn reorder(
    pool: &SqlitePool,
    id: &PlaylistId,
    user_id: &UserId,
    song_ids: &[String],
) -> Result<Vec<PlaylistSong>> {
    find_owned(pool, id, user_id).await?;

    let mut tx = pool.begin().await?;
    for (index, song_id) in song_ids.iter().enumerate() {
        sqlx::query(
            "UPDATE playlist_songs SET position = ? WHERE playlist_id = ? AND song_id = ?",
        )
        .bind(index as i64 + 1)
        .bind(id)
        .bind(song_id)
        .execute(&mut *tx)
        .await?;
    }
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    get_songs(pool, id).await
}
