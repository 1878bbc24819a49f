/// Authentication middleware
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use cadence_core::{User, UserId};
use cadence_storage::users;

/// The user behind a valid access token, stored in request extensions
///
/// As an extractor it rejects anonymous requests with 401; use
/// `Option<AuthenticatedUser>` on routes where signing in is optional.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Resolve the current user from a `Bearer` token, if any
///
/// Requests without a token, with an invalid token, or for a deleted user
/// continue anonymously. Handlers that need a user say so through the
/// `AuthenticatedUser` extractor.
pub async fn resolve_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match authenticate(&state, &token).await {
            Ok(user) => {
                request.extensions_mut().insert(AuthenticatedUser(user));
            }
            Err(e) => tracing::debug!("Continuing anonymously: {}", e),
        }
    }

    next.run(request).await
}

async fn authenticate(state: &AppState, token: &str) -> Result<User, ServerError> {
    let user_id = state.auth_service.verify_access_token(token)?;

    users::get_by_id(state.db.pool(), &user_id)
        .await?
        .ok_or_else(|| ServerError::Auth("User not found".to_string()))
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Authentication required".to_string()))
    }
}
