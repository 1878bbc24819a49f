//! Cadence - Playback Queue
//!
//! Platform-agnostic playback queue for Cadence clients.
//!
//! This crate provides:
//! - The queue state machine (set, jump, next/previous, add/remove)
//! - Repeat modes (Off, All, One)
//! - Uniform shuffle that keeps the current song in front and can be undone
//! - Versioned persistence of the player state with migration on read
//!
//! It does no audio I/O. A client drives [`PlayerQueue`] from its UI and its
//! audio element, and hands the current song's `audio_url` to whatever plays
//! audio on that platform.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::Song;
//! use cadence_playback::{PlayerQueue, PlayerStatus, RepeatMode};
//!
//! let song = |n: u32| Song {
//!     id: format!("song-{n}"),
//!     title: format!("Song {n}"),
//!     duration: 180,
//!     audio_url: format!("https://example.com/audio/song-{n}.mp3"),
//!     cover: String::new(),
//!     genre: "Pop".to_string(),
//!     mood: "Happy".to_string(),
//!     play_count: 0,
//!     artist_id: "artist-1".to_string(),
//!     artist_name: "Artist 1".to_string(),
//!     album_id: None,
//!     album_name: None,
//!     has_preview: false,
//!     is_full_song: true,
//!     external_url: None,
//!     license: None,
//! };
//!
//! let mut player = PlayerQueue::new();
//! player.set_queue(vec![song(1), song(2)], 0);
//! player.set_repeat(RepeatMode::All);
//!
//! player.play_next();
//! player.play_next();
//! assert_eq!(player.current_song().unwrap().id, "song-1");
//! assert_eq!(player.state(), PlayerStatus::Playing);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod persist;
pub mod queue;
pub mod shuffle;
pub mod types;

pub use error::{PlaybackError, Result};
pub use persist::{
    FileStateStore, MemoryStateStore, PersistedPlayerState, StateStore, CURRENT_STATE_VERSION,
    PLAYER_STATE_BLOB,
};
pub use queue::PlayerQueue;
pub use types::{PlayerStatus, RepeatMode, DEFAULT_VOLUME, MAX_CROSSFADE_SECS};
