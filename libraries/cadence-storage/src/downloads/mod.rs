//! Offline download grants

use crate::Result;
use cadence_core::{Download, UserId};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Store a grant for `(user, song)`, replacing the token and expiry of an
/// earlier one.
pub async fn record(
    pool: &SqlitePool,
    user_id: &UserId,
    song_id: &str,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<Download> {
    let downloaded_at = Utc::now();

    sqlx::query(
        "INSERT INTO downloads (user_id, song_id, token, expires_at, downloaded_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id, song_id) DO UPDATE SET
             token = excluded.token,
             expires_at = excluded.expires_at,
             downloaded_at = excluded.downloaded_at",
    )
    .bind(user_id)
    .bind(song_id)
    .bind(token)
    .bind(expires_at)
    .bind(downloaded_at)
    .execute(pool)
    .await?;

    Ok(Download {
        song_id: song_id.to_string(),
        token: token.to_string(),
        expires_at,
        downloaded_at,
    })
}

pub async fn get(pool: &SqlitePool, user_id: &UserId, song_id: &str) -> Result<Option<Download>> {
    let row = sqlx::query(
        "SELECT song_id, token, expires_at, downloaded_at FROM downloads
         WHERE user_id = ? AND song_id = ?",
    )
    .bind(user_id)
    .bind(song_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(download_from_row).transpose()
}

/// All grants of a user, most recent first
pub async fn list(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Download>> {
    let rows = sqlx::query(
        "SELECT song_id, token, expires_at, downloaded_at FROM downloads
         WHERE user_id = ?
         ORDER BY downloaded_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(download_from_row).collect()
}

fn download_from_row(row: &SqliteRow) -> Result<Download> {
    Ok(Download {
        song_id: row.try_get("song_id")?,
        token: row.try_get("token")?,
        expires_at: row.try_get("expires_at")?,
        downloaded_at: row.try_get("downloaded_at")?,
    })
}
