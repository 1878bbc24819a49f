//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default output volume (0.0 - 1.0)
pub const DEFAULT_VOLUME: f64 = 0.7;

/// Longest allowed crossfade, in seconds
pub const MAX_CROSSFADE_SECS: f64 = 12.0;

/// `play_previous` restarts the current song past this point (seconds)
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at the end of the queue
    #[default]
    Off,

    /// Wrap around to the first song
    All,

    /// Replay the current song
    One,
}

impl RepeatMode {
    /// Next mode in the off -> all -> one -> off cycle
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        })
    }
}

/// Player status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// No current song
    Idle,

    /// Current song loaded, not playing
    Paused,

    /// Current song playing
    Playing,
}
