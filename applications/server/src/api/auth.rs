/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    services::auth::TokenPair,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use cadence_core::User;
use cadence_storage::{
    users::{self, NewUser},
    StorageError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// POST /api/auth/signup
pub async fn signup(
    State(app_state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ServerError::BadRequest("A valid email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(ServerError::BadRequest("Password is required".to_string()));
    }
    if req.display_name.trim().is_empty() {
        return Err(ServerError::BadRequest("Display name is required".to_string()));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    let user = users::create(
        app_state.db.pool(),
        NewUser {
            email: email.to_string(),
            password_hash,
            display_name: req.display_name.trim().to_string(),
            avatar: None,
        },
    )
    .await
    .map_err(|e| match e {
        StorageError::Duplicate(_) => ServerError::BadRequest("Email already registered".to_string()),
        other => other.into(),
    })?;

    let tokens = start_session(&app_state, &user).await?;
    tracing::info!(user = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(AuthResponse { user, tokens })))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (user, password_hash) = users::get_with_password_hash(app_state.db.pool(), &req.email)
        .await?
        .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let tokens = start_session(&app_state, &user).await?;
    Ok(Json(AuthResponse { user, tokens }))
}

/// POST /api/auth/refresh
///
/// Rotates both tokens. The presented refresh token must be the one stored
/// for the user, so each refresh token works once.
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    let token = req
        .refresh_token
        .ok_or_else(|| ServerError::Auth("Refresh token required".to_string()))?;

    let user_id = app_state
        .auth_service
        .verify_refresh_token(&token)
        .map_err(|_| ServerError::Auth(INVALID_REFRESH_TOKEN.to_string()))?;

    let stored = users::get_refresh_token(app_state.db.pool(), &user_id).await?;
    if stored.as_deref() != Some(token.as_str()) {
        return Err(ServerError::Auth(INVALID_REFRESH_TOKEN.to_string()));
    }

    let tokens = app_state.auth_service.issue_tokens(&user_id)?;
    users::set_refresh_token(app_state.db.pool(), &user_id, Some(&tokens.refresh_token)).await?;

    Ok(Json(tokens))
}

/// POST /api/auth/logout
pub async fn logout(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<Value>> {
    if let Some(token) = req.refresh_token {
        if let Ok(user_id) = app_state.auth_service.verify_refresh_token(&token) {
            users::set_refresh_token(app_state.db.pool(), &user_id, None).await?;
        }
    }

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

async fn start_session(app_state: &AppState, user: &User) -> Result<TokenPair> {
    let tokens = app_state.auth_service.issue_tokens(&user.id)?;
    users::set_refresh_token(app_state.db.pool(), &user.id, Some(&tokens.refresh_token)).await?;
    Ok(tokens)
}
