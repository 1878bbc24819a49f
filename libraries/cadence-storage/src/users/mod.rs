//! User accounts and credentials

use crate::{Result, StorageError};
use cadence_core::{Role, SubscriptionTier, User, UserId};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str =
    "id, email, display_name, avatar, role, subscription_tier, created_at, updated_at";

/// Data for registering a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    /// Already hashed (bcrypt)
    pub password_hash: String,
    pub display_name: String,
    pub avatar: Option<String>,
}

/// Profile fields a user may change; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

fn default_avatar(email: &str) -> String {
    format!("https://i.pravatar.cc/150?u={}", email)
}

pub(crate) fn user_from_row(row: &SqliteRow) -> Result<User> {
    let role: String = row.try_get("role")?;
    let tier: String = row.try_get("subscription_tier")?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        avatar: row.try_get("avatar")?,
        role: role.parse::<Role>().map_err(StorageError::Corrupt)?,
        subscription_tier: tier
            .parse::<SubscriptionTier>()
            .map_err(StorageError::Corrupt)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Register a user. Emails are unique case-insensitively.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let id = UserId::generate();
    let now = Utc::now();
    let email = user.email.trim().to_lowercase();
    let avatar = user.avatar.unwrap_or_else(|| default_avatar(&email));

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, display_name, avatar, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&email)
    .bind(&user.password_hash)
    .bind(&user.display_name)
    .bind(&avatar)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| StorageError::on_conflict(e, "User already exists"))?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.as_str()))
}

pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// User plus stored password hash, for login
pub async fn get_with_password_hash(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<(User, String)>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?"
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let hash: String = row.try_get("password_hash")?;
            Ok(Some((user_from_row(&row)?, hash)))
        }
        None => Ok(None),
    }
}

pub async fn update_profile(pool: &SqlitePool, id: &UserId, update: UpdateProfile) -> Result<User> {
    let result = sqlx::query(
        "UPDATE users
         SET display_name = COALESCE(?, display_name),
             avatar = COALESCE(?, avatar),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(update.display_name)
    .bind(update.avatar)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.as_str()));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.as_str()))
}

pub async fn set_subscription_tier(
    pool: &SqlitePool,
    id: &UserId,
    tier: SubscriptionTier,
) -> Result<()> {
    let result = sqlx::query("UPDATE users SET subscription_tier = ?, updated_at = ? WHERE id = ?")
        .bind(tier.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.as_str()));
    }
    Ok(())
}

/// Store the current refresh token, or clear it with `None` (logout).
pub async fn set_refresh_token(pool: &SqlitePool, id: &UserId, token: Option<&str>) -> Result<()> {
    sqlx::query("UPDATE users SET refresh_token = ? WHERE id = ?")
        .bind(token)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_refresh_token(pool: &SqlitePool, id: &UserId) -> Result<Option<String>> {
    let token: Option<Option<String>> =
        sqlx::query_scalar("SELECT refresh_token FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(token.flatten())
}
