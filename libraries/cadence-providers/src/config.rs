//! Provider selection and credentials.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::error::{ProviderError, Result};
use crate::jamendo::JamendoProvider;
use crate::mock::MockProvider;
use crate::provider::MusicProvider;
use crate::spotify::SpotifyProvider;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_JAMENDO_API_URL: &str = "https://api.jamendo.com/v3.0";

/// Supported catalogue backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    Spotify,
    Jamendo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mock => "mock",
            ProviderKind::Spotify => "spotify",
            ProviderKind::Jamendo => "jamendo",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" | "dummy" => Ok(ProviderKind::Mock),
            "spotify" => Ok(ProviderKind::Spotify),
            "jamendo" => Ok(ProviderKind::Jamendo),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}

/// Which provider to build and how to reach it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Fixed seed for the mock catalogue's play counts
    #[serde(default)]
    pub mock_seed: Option<u64>,

    #[serde(default)]
    pub spotify: SpotifyConfig,

    #[serde(default)]
    pub jamendo: JamendoConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            mock_seed: None,
            spotify: SpotifyConfig::default(),
            jamendo: JamendoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_spotify_api_url")]
    pub api_url: String,

    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_url: default_spotify_api_url(),
            accounts_url: default_spotify_accounts_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JamendoConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default = "default_jamendo_api_url")]
    pub api_url: String,
}

impl Default for JamendoConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            api_url: default_jamendo_api_url(),
        }
    }
}

fn default_provider_name() -> String {
    "mock".to_string()
}

fn default_spotify_api_url() -> String {
    DEFAULT_SPOTIFY_API_URL.to_string()
}

fn default_spotify_accounts_url() -> String {
    DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string()
}

fn default_jamendo_api_url() -> String {
    DEFAULT_JAMENDO_API_URL.to_string()
}

/// Treat blank strings from env/config as unset.
pub(crate) fn require(
    value: &Option<String>,
    provider: &'static str,
    field: &'static str,
) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ProviderError::MissingCredentials { provider, field })
}

/// Build the configured provider.
///
/// Called once at startup. An unknown name or missing credentials for a live
/// backend is an error; there is no fallback to another provider.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn MusicProvider>> {
    let kind: ProviderKind = config.name.parse()?;

    let provider: Arc<dyn MusicProvider> = match kind {
        ProviderKind::Mock => match config.mock_seed {
            Some(seed) => Arc::new(MockProvider::with_seed(seed)),
            None => Arc::new(MockProvider::new()),
        },
        ProviderKind::Spotify => Arc::new(SpotifyProvider::new(&config.spotify)?),
        ProviderKind::Jamendo => Arc::new(JamendoProvider::new(&config.jamendo)?),
    };

    info!(provider = %kind, "Music provider initialized");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("Spotify".parse::<ProviderKind>().unwrap(), ProviderKind::Spotify);
        assert_eq!(" jamendo ".parse::<ProviderKind>().unwrap(), ProviderKind::Jamendo);
        assert_eq!("mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
    }

    #[test]
    fn dummy_selects_mock_catalogue() {
        assert_eq!("DUMMY".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);

        let config = ProviderConfig {
            name: "dummy".to_string(),
            ..Default::default()
        };
        assert_eq!(create_provider(&config).unwrap().name(), "mock");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = ProviderConfig {
            name: "napster".to_string(),
            ..Default::default()
        };
        match create_provider(&config) {
            Err(ProviderError::UnknownProvider(name)) => assert_eq!(name, "napster"),
            other => panic!("expected UnknownProvider, got {:?}", other.map(|p| p.name())),
        }
    }

    #[test]
    fn live_provider_without_credentials_is_rejected() {
        let config = ProviderConfig {
            name: "spotify".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(ProviderError::MissingCredentials {
                provider: "spotify",
                field: "client_id"
            })
        ));

        let config = ProviderConfig {
            name: "jamendo".to_string(),
            jamendo: JamendoConfig {
                client_id: Some("   ".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(ProviderError::MissingCredentials { provider: "jamendo", .. })
        ));
    }

    #[test]
    fn default_config_builds_mock() {
        let provider = create_provider(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "mock");
    }
}
