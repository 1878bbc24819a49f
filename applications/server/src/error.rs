/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_core::CadenceError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Core(#[from] CadenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] cadence_providers::ProviderError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<cadence_storage::StorageError> for ServerError {
    fn from(err: cadence_storage::StorageError) -> Self {
        ServerError::Core(err.into())
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Core(core) => match core {
                CadenceError::NotFound { .. } => StatusCode::NOT_FOUND,
                CadenceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                CadenceError::Duplicate(_) | CadenceError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            ServerError::Auth(msg)
            | ServerError::Forbidden(msg)
            | ServerError::NotFound(msg)
            | ServerError::BadRequest(msg) => msg,
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT rejected: {:?}", e);
                "Invalid token".to_string()
            }
            ServerError::Core(CadenceError::NotFound { entity, .. }) => {
                format!("{} not found", entity)
            }
            ServerError::Core(CadenceError::PermissionDenied(_)) => "Not authorized".to_string(),
            ServerError::Core(CadenceError::Duplicate(msg) | CadenceError::InvalidInput(msg)) => {
                msg
            }
            ServerError::Core(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
            ServerError::Provider(ref e) => {
                tracing::error!("Provider error: {:?}", e);
                "Provider error".to_string()
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                "Password error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
