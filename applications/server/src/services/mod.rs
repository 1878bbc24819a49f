/// Server services
pub mod auth;
pub mod cache;
pub mod recommendations;

pub use auth::AuthService;
pub use cache::ResponseCache;
pub use recommendations::RecommendationService;
