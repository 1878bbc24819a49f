//! Liked songs

use crate::{Result, StorageError};
use cadence_core::{LikedSong, UserId};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub async fn like(pool: &SqlitePool, user_id: &UserId, song_id: &str) -> Result<LikedSong> {
    let liked_at = Utc::now();

    sqlx::query("INSERT INTO liked_songs (user_id, song_id, liked_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(song_id)
        .bind(liked_at)
        .execute(pool)
        .await
        .map_err(|e| StorageError::on_conflict(e, "Song already liked"))?;

    Ok(LikedSong {
        song_id: song_id.to_string(),
        liked_at,
    })
}

/// Returns whether a like was removed.
pub async fn unlike(pool: &SqlitePool, user_id: &UserId, song_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM liked_songs WHERE user_id = ? AND song_id = ?")
        .bind(user_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All likes, most recent first
pub async fn list(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<LikedSong>> {
    let rows = sqlx::query(
        "SELECT song_id, liked_at FROM liked_songs
         WHERE user_id = ?
         ORDER BY liked_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(LikedSong {
                song_id: row.try_get("song_id")?,
                liked_at: row.try_get("liked_at")?,
            })
        })
        .collect()
}

pub async fn recent_song_ids(pool: &SqlitePool, user_id: &UserId, limit: i64) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar(
        "SELECT song_id FROM liked_songs
         WHERE user_id = ?
         ORDER BY liked_at DESC, rowid DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn is_liked(pool: &SqlitePool, user_id: &UserId, song_id: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM liked_songs WHERE user_id = ? AND song_id = ?")
            .bind(user_id)
            .bind(song_id)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}
