//! Cadence Core
//!
//! Shared domain types and error handling for Cadence.
//!
//! Every music provider (mock, Spotify, Jamendo) normalizes its catalogue into
//! the types defined here, so the server and the playback library never see a
//! backend-specific shape.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Catalogue Types**: `Song`, `Artist`, `Album`, `StreamInfo`
//! - **Query Types**: `SearchFilters`, `RecommendationContext`
//! - **Account Types**: `User`, `Playlist`, `Activity`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{SearchFilters, StreamQuality};
//!
//! let filters = SearchFilters {
//!     genre: Some("Jazz".to_string()),
//!     limit: Some(5),
//!     ..Default::default()
//! };
//! assert_eq!(filters.effective_limit(20), 5);
//!
//! let quality: StreamQuality = "high".parse().unwrap();
//! assert_eq!(quality, StreamQuality::High);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use types::{
    dedup_genres, release_year, Activity, ActivityKind, Album, AlbumSummary, Artist, ArtistRef,
    ArtistSummary, CreatePlaylist, Download, LikedSong, Playlist, PlaylistId, PlaylistSong,
    RecommendationContext, Recommendations, Role, SearchFilters, Song, StreamInfo, StreamQuality,
    SubscriptionTier, UpdatePlaylist, User, UserId, MAX_SEARCH_LIMIT,
};
