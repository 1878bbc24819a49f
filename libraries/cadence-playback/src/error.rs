//! Error types for playback state

use thiserror::Error;

/// Playback errors
///
/// Queue operations never fail; only persistence does.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Persisted blob was written by a newer format
    #[error("Unsupported player state version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    /// Persisted blob is not valid player state
    #[error("Invalid player state: {0}")]
    InvalidState(String),

    /// Blob name cannot be used as a storage key
    #[error("Invalid blob name: {0}")]
    InvalidBlobName(String),

    /// JSON encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
