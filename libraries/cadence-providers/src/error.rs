//! Error types for music providers.

use thiserror::Error;

/// Errors raised while talking to a music backend or building a provider.
///
/// These never cross the [`MusicProvider`](crate::MusicProvider) boundary:
/// provider methods log them and degrade to an empty or absent result.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Backend answered 200 but flagged the request as failed
    #[error("Backend rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// Token exchange with the backend failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Failed to parse backend response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid backend base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Configured provider name is not recognized
    #[error("Unknown music provider: {0}")]
    UnknownProvider(String),

    /// A live backend was selected without its credentials
    #[error("Missing {field} for the {provider} provider")]
    MissingCredentials {
        provider: &'static str,
        field: &'static str,
    },
}

impl ProviderError {
    /// Whether the backend reported the requested entity as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Backend { status: 404, .. })
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
