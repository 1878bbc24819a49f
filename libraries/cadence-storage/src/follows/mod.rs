//! Followed artists

use crate::{Result, StorageError};
use cadence_core::UserId;
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn follow(pool: &SqlitePool, user_id: &UserId, artist_id: &str) -> Result<()> {
    sqlx::query("INSERT INTO followed_artists (user_id, artist_id, followed_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(artist_id)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| StorageError::on_conflict(e, "Already following"))?;

    Ok(())
}

/// Returns whether a follow was removed.
pub async fn unfollow(pool: &SqlitePool, user_id: &UserId, artist_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM followed_artists WHERE user_id = ? AND artist_id = ?")
        .bind(user_id)
        .bind(artist_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Followed artist ids, most recent first
pub async fn list_artist_ids(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar(
        "SELECT artist_id FROM followed_artists
         WHERE user_id = ?
         ORDER BY followed_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
