//! The music provider capability contract.

use async_trait::async_trait;
use cadence_core::{
    Album, Artist, RecommendationContext, Recommendations, SearchFilters, Song, StreamInfo,
    StreamQuality,
};

use crate::error::ProviderError;

/// Uniform access to an external music catalogue.
///
/// Implementations never fail the caller. Backend errors are logged and
/// turned into an empty list or `None`, so "no results" and "backend down"
/// look the same from the outside.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Short identifier of the backend (`mock`, `spotify`, `jamendo`)
    fn name(&self) -> &'static str;

    /// Free-text search, narrowed by the filters the backend supports.
    ///
    /// | filter    | mock | spotify | jamendo |
    /// |-----------|------|---------|---------|
    /// | genre     | yes  | yes     | yes     |
    /// | artist_id | yes  | yes     | yes     |
    /// | year      | yes  | yes     | no      |
    /// | mood      | yes  | no      | no      |
    ///
    /// Unsupported filters are ignored, not rejected.
    async fn search_songs(&self, query: &str, filters: &SearchFilters) -> Vec<Song>;

    async fn get_song(&self, id: &str) -> Option<Song>;

    /// Artist with top tracks, albums and related artists filled in.
    async fn get_artist(&self, id: &str) -> Option<Artist>;

    async fn get_album(&self, id: &str) -> Option<Album>;

    async fn get_recommendations(
        &self,
        user_id: &str,
        context: &RecommendationContext,
    ) -> Recommendations;

    /// Resolve a playable URL for `song_id`.
    ///
    /// `None` means the song does not exist. A song without audio yields
    /// `Some` with an empty `url`.
    async fn get_stream_url(&self, song_id: &str, quality: StreamQuality) -> Option<StreamInfo>;
}

/// Log a swallowed lookup failure. Missing entities are expected and logged
/// at debug level only.
pub(crate) fn log_lookup_failure(provider: &str, operation: &str, id: &str, err: &ProviderError) {
    if err.is_not_found() {
        tracing::debug!(provider, operation, id, "Entity not found at backend");
    } else {
        tracing::warn!(provider, operation, id, error = %err, "Provider lookup failed");
    }
}
