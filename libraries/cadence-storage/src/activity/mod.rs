//! Activity feed and play history

use crate::{Result, StorageError};
use cadence_core::{Activity, ActivityKind, UserId};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub const FEED_LIMIT: i64 = 50;

/// Append an activity. A `songId` in the metadata is indexed for play
/// history and trending queries.
pub async fn record(
    pool: &SqlitePool,
    user_id: &UserId,
    kind: ActivityKind,
    metadata: serde_json::Value,
) -> Result<Activity> {
    let created_at = Utc::now();
    let song_id = metadata
        .get("songId")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let result = sqlx::query(
        "INSERT INTO activities (user_id, kind, metadata, song_id, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(metadata.to_string())
    .bind(&song_id)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(Activity {
        id: result.last_insert_rowid(),
        user_id: user_id.clone(),
        kind,
        metadata,
        created_at,
    })
}

/// Latest activities for a user, newest first
pub async fn list_recent(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Activity>> {
    let rows = sqlx::query(
        "SELECT id, user_id, kind, metadata, created_at FROM activities
         WHERE user_id = ?
         ORDER BY created_at DESC, id DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(FEED_LIMIT)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let kind: String = row.try_get("kind")?;
            let metadata: String = row.try_get("metadata")?;

            Ok(Activity {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                kind: kind.parse().map_err(StorageError::Corrupt)?,
                metadata: serde_json::from_str(&metadata)
                    .map_err(|e| StorageError::Corrupt(e.to_string()))?,
                created_at: row.try_get("created_at")?,
            })
        })
        .collect()
}

/// Most recently played song ids, newest first, without repeats
pub async fn recent_played_song_ids(
    pool: &SqlitePool,
    user_id: &UserId,
    limit: i64,
) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar(
        "SELECT song_id FROM activities
         WHERE user_id = ? AND kind = ? AND song_id IS NOT NULL
         GROUP BY song_id
         ORDER BY MAX(id) DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(ActivityKind::PlayedSong.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Songs with the most plays since `since`, across all users
pub async fn trending_song_ids(
    pool: &SqlitePool,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query(
        "SELECT song_id, COUNT(*) AS plays FROM activities
         WHERE kind = ? AND song_id IS NOT NULL AND created_at >= ?
         GROUP BY song_id
         ORDER BY plays DESC, MAX(id) DESC
         LIMIT ?",
    )
    .bind(ActivityKind::PlayedSong.as_str())
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| Ok((row.try_get("song_id")?, row.try_get("plays")?)))
        .collect()
}
