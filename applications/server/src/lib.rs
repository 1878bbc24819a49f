//! Cadence Server Library
//!
//! REST API over a pluggable music provider, with accounts, playlists, likes,
//! follows and listening activity persisted in `SQLite`.
//!
//! This library exposes the router and its components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{AuthService, RecommendationService, ResponseCache};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router, everything nested under `/api`
///
/// `cors_origin` restricts browser access to one origin; `None` allows any.
pub fn create_router(app_state: AppState, cors_origin: Option<&str>) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(api::auth::signup))
        .route("/login", post(api::auth::login))
        .route("/refresh", post(api::auth::refresh))
        .route("/logout", post(api::auth::logout));

    let song_routes = Router::new()
        .route("/", get(api::songs::list_songs))
        .route("/:id", get(api::songs::get_song))
        .route("/:id/stream", get(api::songs::stream_song))
        .route("/:id/download", post(api::songs::download_song));

    let search_routes = Router::new()
        .route("/", get(api::search::search))
        .route("/suggestions", get(api::search::suggestions));

    let artist_routes = Router::new()
        .route("/:id", get(api::artists::get_artist))
        .route("/:id/albums", get(api::artists::get_artist_albums))
        .route("/:id/top-tracks", get(api::artists::get_artist_top_tracks))
        .route("/:id/related", get(api::artists::get_related_artists));

    let user_routes = Router::new()
        .route("/me", get(api::users::get_me).patch(api::users::update_me))
        .route("/me/playlists", get(api::users::my_playlists))
        .route("/me/liked-songs", get(api::users::liked_songs))
        .route(
            "/me/liked-songs/:song_id",
            post(api::users::like_song).delete(api::users::unlike_song),
        )
        .route("/me/activity", get(api::users::my_activity))
        .route(
            "/follow/artist/:artist_id",
            post(api::users::follow_artist).delete(api::users::unfollow_artist),
        );

    let playlist_routes = Router::new()
        .route("/", post(api::playlists::create_playlist))
        .route(
            "/:id",
            get(api::playlists::get_playlist)
                .patch(api::playlists::update_playlist)
                .delete(api::playlists::delete_playlist),
        )
        .route("/:id/songs", post(api::playlists::add_song))
        .route(
            "/:id/songs/:song_id",
            axum::routing::delete(api::playlists::remove_song),
        )
        .route("/:id/reorder", put(api::playlists::reorder_playlist));

    let recommendation_routes = Router::new()
        .route("/", get(api::recommendations::personalized))
        .route("/for-you", get(api::recommendations::for_you))
        .route("/mood/:mood", get(api::recommendations::by_mood))
        .route("/similar/:song_id", get(api::recommendations::similar))
        .route("/trending", get(api::recommendations::trending))
        .route("/radio/:song_id", get(api::recommendations::radio));

    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/albums/:id", get(api::artists::get_album))
        .nest("/auth", auth_routes)
        .nest("/songs", song_routes)
        .nest("/search", search_routes)
        .nest("/artists", artist_routes)
        .nest("/users", user_routes)
        .nest("/playlists", playlist_routes)
        .nest("/recommendations", recommendation_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::resolve_user,
        ));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(cors_layer(cors_origin))
        .with_state(app_state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            CorsLayer::permissive()
        }
    }
}
