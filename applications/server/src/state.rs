/// Shared application state
use crate::config::ServerConfig;
use crate::error::Result;
use crate::services::{AuthService, RecommendationService, ResponseCache};
use cadence_providers::MusicProvider;
use cadence_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth_service: Arc<AuthService>,
    pub provider: Arc<dyn MusicProvider>,
    pub cache: Arc<ResponseCache>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(
        db: Database,
        auth_service: Arc<AuthService>,
        provider: Arc<dyn MusicProvider>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let recommendations = Arc::new(RecommendationService::new(
            Arc::clone(&provider),
            db.clone(),
        ));
        Self {
            db,
            auth_service,
            provider,
            cache,
            recommendations,
        }
    }

    /// Connect storage, build the configured provider and services
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let db = Database::connect(&config.storage.database_url).await?;
        tracing::info!("Database connected");

        let provider = cadence_providers::create_provider(&config.provider)?;

        let auth_service = AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.access_token_minutes,
            config.auth.refresh_token_days,
        )
        .with_bcrypt_cost(config.auth.bcrypt_cost);

        let cache = ResponseCache::new(config.cache.capacity);

        Ok(Self::new(
            db,
            Arc::new(auth_service),
            provider,
            Arc::new(cache),
        ))
    }
}
