/// API route modules
pub mod artists;
pub mod auth;
pub mod health;
pub mod playlists;
pub mod recommendations;
pub mod search;
pub mod songs;
pub mod users;
