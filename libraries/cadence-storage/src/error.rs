/// Storage-specific errors
use cadence_core::CadenceError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint hit (email taken, song already liked, ...)
    #[error("{0}")]
    Duplicate(String),

    /// Caller does not own the entity
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Stored value could not be decoded
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Turn a unique-constraint violation into `Duplicate(message)`.
    pub(crate) fn on_conflict(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Duplicate(message.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<StorageError> for CadenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => CadenceError::NotFound { entity, id },
            StorageError::Duplicate(msg) => CadenceError::Duplicate(msg),
            StorageError::PermissionDenied(msg) => CadenceError::PermissionDenied(msg),
            other => CadenceError::storage(other.to_string()),
        }
    }
}
