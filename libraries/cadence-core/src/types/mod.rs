mod activity;
mod download;
mod ids;
mod playlist;
mod user;

// Provider-normalized catalogue types
mod album;
mod artist;
mod search;
mod song;
mod stream;

pub use activity::{Activity, ActivityKind};
pub use download::Download;
pub use ids::{PlaylistId, UserId};
pub use playlist::{CreatePlaylist, LikedSong, Playlist, PlaylistSong, UpdatePlaylist};
pub use user::{Role, SubscriptionTier, User};

pub use album::{release_year, Album, AlbumSummary};
pub use artist::{dedup_genres, Artist, ArtistRef, ArtistSummary};
pub use search::{RecommendationContext, Recommendations, SearchFilters, MAX_SEARCH_LIMIT};
pub use song::Song;
pub use stream::{StreamInfo, StreamQuality};
