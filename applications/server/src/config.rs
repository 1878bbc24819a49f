/// Server configuration
use crate::error::{Result, ServerError};
use cadence_providers::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default = "default_cache")]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed browser origin; any origin when unset
    #[serde(default)]
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,

    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Maximum number of cached provider responses
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl ServerConfig {
    /// Load configuration from `config.toml` (or `path`) and the environment
    ///
    /// Environment variables use the `CADENCE_` prefix and `__` between
    /// nested keys, e.g. `CADENCE_AUTH__JWT_SECRET`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set CADENCE_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        // Fail at startup rather than on the first request
        self.provider
            .name
            .parse::<cadence_providers::ProviderKind>()?;

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        cors_origin: None,
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        access_token_minutes: default_access_token_minutes(),
        refresh_token_days: default_refresh_token_days(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_access_token_minutes() -> u64 {
    15
}

fn default_refresh_token_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_cache() -> CacheSettings {
    CacheSettings {
        capacity: default_cache_capacity(),
    }
}

fn default_cache_capacity() -> usize {
    512
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            provider: ProviderConfig::default(),
            cache: default_cache(),
        }
    }
}
