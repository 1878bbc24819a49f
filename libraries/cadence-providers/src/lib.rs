//! Cadence music providers
//!
//! A [`MusicProvider`] hides one external catalogue behind a uniform async
//! contract. Three backends are available:
//!
//! - [`MockProvider`]: generated catalogue, no network
//! - [`SpotifyProvider`]: Spotify Web API, 30-second previews only
//! - [`JamendoProvider`]: Jamendo open-license catalogue, full-length audio
//!
//! The backend is chosen once at startup from [`ProviderConfig`]:
//!
//! ```rust
//! use cadence_providers::{create_provider, ProviderConfig};
//!
//! let provider = create_provider(&ProviderConfig::default()).unwrap();
//! assert_eq!(provider.name(), "mock");
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod http;
mod jamendo;
mod mock;
mod provider;
mod spotify;

pub use config::{
    create_provider, JamendoConfig, ProviderConfig, ProviderKind, SpotifyConfig,
    DEFAULT_JAMENDO_API_URL, DEFAULT_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_API_URL,
};
pub use error::{ProviderError, Result};
pub use jamendo::JamendoProvider;
pub use mock::{MockProvider, GENRES, MOODS};
pub use provider::MusicProvider;
pub use spotify::{infer_mood, SpotifyProvider, TokenCache, TokenGrant, RENEWAL_MARGIN};
