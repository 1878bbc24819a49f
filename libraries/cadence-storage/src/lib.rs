//! Cadence Storage
//!
//! `SQLite` persistence for everything Cadence owns itself: accounts,
//! playlists, liked songs, followed artists, download grants and the
//! activity feed. Catalogue data stays with the music provider; rows here
//! only hold provider ids.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries
//! - **Embedded Migrations**: the schema ships inside the binary
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{users, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://cadence.db").await?;
//! let user = users::get_by_email(db.pool(), "ada@example.com").await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod activity;
pub mod downloads;
pub mod follows;
pub mod likes;
pub mod playlists;
pub mod users;

pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Bring the schema up to date. Call once at startup.
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a `SQLite` pool
///
/// File databases are created when missing and run in WAL mode. An in-memory
/// database lives only as long as its connection, so it gets exactly one that
/// is never recycled.
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(in_memory, "Database pool ready");

    Ok(pool)
}

/// Storage context shared by the server
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and apply pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
