//! Playback queue state machine
//!
//! Holds the play queue, the pre-shuffle snapshot, and player settings.
//! Single owner, synchronous, never panics.
//!
//! Invariant: whenever `queue` is non-empty, `queue_index < queue.len()` and
//! `current_song` is `queue[queue_index]`. An empty queue means no current
//! song.

use cadence_core::Song;
use rand::Rng;

use crate::shuffle::shuffle_pinned;
use crate::types::{
    PlayerStatus, RepeatMode, DEFAULT_VOLUME, MAX_CROSSFADE_SECS, RESTART_THRESHOLD_SECS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerQueue {
    pub(crate) queue: Vec<Song>,
    /// Pre-shuffle order; mirrors `queue` while shuffle is off
    pub(crate) original_queue: Vec<Song>,
    pub(crate) queue_index: usize,
    pub(crate) current_song: Option<Song>,
    pub(crate) is_playing: bool,
    pub(crate) progress: f64,
    pub(crate) volume: f64,
    pub(crate) repeat: RepeatMode,
    pub(crate) shuffle: bool,
    pub(crate) crossfade: f64,
}

impl Default for PlayerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerQueue {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            original_queue: Vec::new(),
            queue_index: 0,
            current_song: None,
            is_playing: false,
            progress: 0.0,
            volume: DEFAULT_VOLUME,
            repeat: RepeatMode::Off,
            shuffle: false,
            crossfade: 0.0,
        }
    }

    // ===== Accessors =====

    pub fn queue(&self) -> &[Song] {
        &self.queue
    }

    pub fn original_queue(&self) -> &[Song] {
        &self.original_queue
    }

    pub fn queue_index(&self) -> usize {
        self.queue_index
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.current_song.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Position in the current song, in seconds
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Crossfade duration, in seconds
    pub fn crossfade(&self) -> f64 {
        self.crossfade
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn state(&self) -> PlayerStatus {
        match (&self.current_song, self.is_playing) {
            (None, _) => PlayerStatus::Idle,
            (Some(_), false) => PlayerStatus::Paused,
            (Some(_), true) => PlayerStatus::Playing,
        }
    }

    // ===== Queue replacement =====

    /// Replace the queue and start playing at `start_index` (clamped).
    ///
    /// Does not reshuffle even when shuffle is on. An empty list stops
    /// playback.
    pub fn set_queue(&mut self, songs: Vec<Song>, start_index: usize) {
        if songs.is_empty() {
            self.clear();
            return;
        }

        let index = start_index.min(songs.len() - 1);
        self.original_queue = songs.clone();
        self.queue = songs;
        self.jump_to(index);
    }

    /// Play `song`, jumping to it when already queued.
    ///
    /// A song not in the queue replaces the queue with just itself.
    pub fn set_current_song(&mut self, song: Song) {
        match self.position_of(&song.id) {
            Some(index) => self.jump_to(index),
            None => {
                self.queue = vec![song.clone()];
                self.original_queue = vec![song];
                self.jump_to(0);
            }
        }
    }

    /// Drop every song and stop.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.original_queue.clear();
        self.queue_index = 0;
        self.current_song = None;
        self.is_playing = false;
        self.progress = 0.0;
    }

    // ===== Transport =====

    /// Flip between playing and paused. Does nothing without a current song.
    pub fn toggle_play(&mut self) {
        if self.current_song.is_some() {
            self.is_playing = !self.is_playing;
        }
    }

    pub fn play(&mut self) {
        if self.current_song.is_some() {
            self.is_playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Advance according to the repeat mode.
    ///
    /// Past the last song with repeat off, playback stops and the last song
    /// stays current.
    pub fn play_next(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        if self.repeat == RepeatMode::One {
            self.progress = 0.0;
            return;
        }

        let next = self.queue_index + 1;
        if next < self.queue.len() {
            self.jump_to(next);
        } else if self.repeat == RepeatMode::All {
            self.jump_to(0);
        } else {
            self.is_playing = false;
        }
    }

    /// Restart the current song if past the restart threshold, otherwise step
    /// back (wrapping from the first song to the last).
    pub fn play_previous(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        if self.progress > RESTART_THRESHOLD_SECS {
            self.progress = 0.0;
            return;
        }

        let previous = match self.queue_index {
            0 => self.queue.len() - 1,
            i => i - 1,
        };
        self.jump_to(previous);
    }

    // ===== Shuffle =====

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.set_shuffle_with_rng(enabled, &mut rand::thread_rng());
    }

    /// Enable or disable shuffle using the given RNG.
    ///
    /// Enabling moves the current song to the front and permutes the rest.
    /// Disabling restores the pre-shuffle order and follows the current song.
    pub fn set_shuffle_with_rng<R: Rng + ?Sized>(&mut self, enabled: bool, rng: &mut R) {
        if enabled == self.shuffle {
            return;
        }
        self.shuffle = enabled;

        if enabled {
            if self.queue.is_empty() {
                return;
            }
            let shuffled = shuffle_pinned(&self.queue, self.queue_index, rng);
            self.original_queue = std::mem::replace(&mut self.queue, shuffled);
            self.queue_index = 0;
        } else {
            // No snapshot: shuffle was enabled on an empty queue
            if self.original_queue.is_empty() {
                self.original_queue = self.queue.clone();
            }
            self.queue = self.original_queue.clone();
            self.queue_index = self
                .current_song
                .as_ref()
                .and_then(|song| self.position_of(&song.id))
                .unwrap_or(0);
        }

        self.sync_current();
    }

    // ===== Editing =====

    /// Append a song. While shuffled, the pre-shuffle order is left alone.
    pub fn add_to_queue(&mut self, song: Song) {
        if !self.shuffle {
            self.original_queue.push(song.clone());
        }
        self.queue.push(song);
        if self.current_song.is_none() {
            self.current_song = self.queue.get(self.queue_index).cloned();
        }
    }

    /// Remove the song at `index`. Out-of-range indices are ignored.
    pub fn remove_from_queue(&mut self, index: usize) {
        if index >= self.queue.len() {
            return;
        }

        let removed = self.queue.remove(index);

        if self.shuffle {
            if let Some(pos) = self.original_queue.iter().position(|s| s.id == removed.id) {
                self.original_queue.remove(pos);
            }
        } else if index < self.original_queue.len() {
            self.original_queue.remove(index);
        }

        if self.queue.is_empty() {
            self.queue_index = 0;
            self.current_song = None;
            self.is_playing = false;
            self.progress = 0.0;
            return;
        }

        if index < self.queue_index {
            self.queue_index -= 1;
        } else if index == self.queue_index {
            self.queue_index = self.queue_index.min(self.queue.len() - 1);
            self.progress = 0.0;
        }

        self.sync_current();
    }

    // ===== Settings =====

    /// Set volume, clamped to 0.0 - 1.0. NaN is ignored.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Set playback position in seconds. Negative or NaN becomes 0.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.max(0.0) };
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    /// Advance off -> all -> one -> off and return the new mode.
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    /// Set crossfade in seconds, clamped to 0 - 12. NaN is ignored.
    pub fn set_crossfade(&mut self, seconds: f64) {
        if !seconds.is_nan() {
            self.crossfade = seconds.clamp(0.0, MAX_CROSSFADE_SECS);
        }
    }

    // ===== Internals =====

    fn position_of(&self, song_id: &str) -> Option<usize> {
        self.queue.iter().position(|s| s.id == song_id)
    }

    /// Make `index` current and start playing it from the top.
    fn jump_to(&mut self, index: usize) {
        self.queue_index = index;
        self.sync_current();
        self.is_playing = self.current_song.is_some();
        self.progress = 0.0;
    }

    /// Re-derive `current_song` from `queue_index`, clamping the index.
    pub(crate) fn sync_current(&mut self) {
        if self.queue.is_empty() {
            self.queue_index = 0;
            self.current_song = None;
            self.is_playing = false;
            return;
        }
        self.queue_index = self.queue_index.min(self.queue.len() - 1);
        self.current_song = Some(self.queue[self.queue_index].clone());
    }
}
