//! Persisted player state
//!
//! The player survives restarts as one named JSON blob. The blob carries an
//! explicit `version`; older layouts are migrated on read and newer ones are
//! refused.

use cadence_core::Song;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::{PlaybackError, Result};
use crate::queue::PlayerQueue;
use crate::types::{RepeatMode, DEFAULT_VOLUME, MAX_CROSSFADE_SECS};

/// Storage key of the player blob
pub const PLAYER_STATE_BLOB: &str = "player-storage";

/// Layout version written by this crate
pub const CURRENT_STATE_VERSION: u32 = 1;

/// Snapshot of the player as written to storage
///
/// Transient fields (`is_playing`, `progress`) are not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPlayerState {
    #[serde(default = "current_version")]
    pub version: u32,

    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default)]
    pub repeat: RepeatMode,

    #[serde(default)]
    pub shuffle: bool,

    #[serde(default)]
    pub crossfade: f64,

    #[serde(default)]
    pub queue: Vec<Song>,

    #[serde(default)]
    pub original_queue: Vec<Song>,

    #[serde(default)]
    pub queue_index: usize,

    #[serde(default)]
    pub current_song: Option<Song>,
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

fn current_version() -> u32 {
    CURRENT_STATE_VERSION
}

/// Version 0: the unversioned layout (same fields, no `version`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPlayerState {
    #[serde(default = "default_volume")]
    volume: f64,
    #[serde(default)]
    repeat: RepeatMode,
    #[serde(default)]
    shuffle: bool,
    #[serde(default)]
    crossfade: f64,
    #[serde(default)]
    queue: Vec<Song>,
    #[serde(default)]
    original_queue: Vec<Song>,
    #[serde(default)]
    queue_index: usize,
    #[serde(default)]
    current_song: Option<Song>,
}

impl From<LegacyPlayerState> for PersistedPlayerState {
    fn from(legacy: LegacyPlayerState) -> Self {
        Self {
            version: CURRENT_STATE_VERSION,
            volume: legacy.volume,
            repeat: legacy.repeat,
            shuffle: legacy.shuffle,
            crossfade: legacy.crossfade,
            queue: legacy.queue,
            original_queue: legacy.original_queue,
            queue_index: legacy.queue_index,
            current_song: legacy.current_song,
        }
    }
}

impl PersistedPlayerState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a blob of any known version, migrating it to the current one.
    ///
    /// Accepted shapes:
    /// - `{"version": 1, ...}`: current layout
    /// - `{...}` without `version`: legacy layout
    /// - `{"state": {...}, "version": n}`: legacy envelope around the fields
    pub fn from_json(blob: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(blob)?;
        let Value::Object(mut object) = value else {
            return Err(PlaybackError::InvalidState(
                "player state must be a JSON object".to_string(),
            ));
        };

        let (version, payload) = match object.remove("state") {
            Some(state) => (read_version(object.get("version"))?, state),
            None => (read_version(object.get("version"))?, Value::Object(object)),
        };

        if version > u64::from(CURRENT_STATE_VERSION) {
            return Err(PlaybackError::UnsupportedVersion {
                found: version,
                supported: CURRENT_STATE_VERSION,
            });
        }

        if version < u64::from(CURRENT_STATE_VERSION) {
            let legacy: LegacyPlayerState = serde_json::from_value(payload)?;
            info!(from = version, to = CURRENT_STATE_VERSION, "Migrated player state");
            return Ok(legacy.into());
        }

        let mut state: PersistedPlayerState = serde_json::from_value(payload)?;
        state.version = CURRENT_STATE_VERSION;
        Ok(state)
    }
}

/// Missing version means the unversioned layout (0).
fn read_version(value: Option<&Value>) -> Result<u64> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v.as_u64().ok_or_else(|| {
            PlaybackError::InvalidState(format!("version must be a non-negative integer, got {v}"))
        }),
    }
}

impl PlayerQueue {
    /// Capture the persistable part of the player.
    pub fn snapshot(&self) -> PersistedPlayerState {
        PersistedPlayerState {
            version: CURRENT_STATE_VERSION,
            volume: self.volume,
            repeat: self.repeat,
            shuffle: self.shuffle,
            crossfade: self.crossfade,
            queue: self.queue.clone(),
            original_queue: self.original_queue.clone(),
            queue_index: self.queue_index,
            current_song: self.current_song.clone(),
        }
    }

    /// Rebuild a player from a snapshot.
    ///
    /// The index is clamped and the current song re-derived from it, so a
    /// hand-edited or stale blob still yields a consistent player. Playback
    /// never resumes on its own.
    pub fn restore(state: PersistedPlayerState) -> Self {
        let mut player = PlayerQueue::new();
        player.set_volume(state.volume);
        player.set_crossfade(state.crossfade);
        player.repeat = state.repeat;
        player.shuffle = state.shuffle;
        player.original_queue = if state.original_queue.is_empty() {
            state.queue.clone()
        } else {
            state.original_queue
        };
        player.queue = state.queue;
        player.queue_index = state.queue_index;
        player.sync_current();
        player.is_playing = false;
        player
    }

    /// Write the player to `store` under [`PLAYER_STATE_BLOB`].
    pub fn persist(&self, store: &dyn StateStore) -> Result<()> {
        store.save(PLAYER_STATE_BLOB, &self.snapshot().to_json()?)
    }

    /// Load the player from `store`; `None` when nothing was saved yet.
    pub fn rehydrate(store: &dyn StateStore) -> Result<Option<Self>> {
        match store.load(PLAYER_STATE_BLOB)? {
            Some(blob) => Ok(Some(Self::restore(PersistedPlayerState::from_json(&blob)?))),
            None => Ok(None),
        }
    }
}

/// Key-value storage for named state blobs
pub trait StateStore: Send + Sync {
    fn load(&self, name: &str) -> Result<Option<String>>;

    fn save(&self, name: &str, blob: &str) -> Result<()>;

    fn remove(&self, name: &str) -> Result<()>;
}

/// In-process store, mainly for tests and headless clients
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(self.blobs().get(name).cloned())
    }

    fn save(&self, name: &str, blob: &str) -> Result<()> {
        self.blobs().insert(name.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.blobs().remove(name);
        Ok(())
    }
}

/// One `<name>.json` file per blob in a directory
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !name.starts_with('.');
        if !valid {
            return Err(PlaybackError::InvalidBlobName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temporary file first so a crash never leaves half a blob.
    fn save(&self, name: &str, blob: &str) -> Result<()> {
        let path = self.path_for(name)?;
        let tmp = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp)?;
        file.write_all(blob.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), bytes = blob.len(), "Saved state blob");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path_for(name)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::songs;
    use serde_json::json;

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut player = PlayerQueue::new();
        player.set_queue(songs(4), 2);
        player.set_volume(0.4);
        player.set_repeat(RepeatMode::All);

        let json = player.snapshot().to_json().unwrap();
        let state = PersistedPlayerState::from_json(&json).unwrap();

        assert_eq!(state.version, 1);
        assert_eq!(state, player.snapshot());
    }

    #[test]
    fn unversioned_blob_is_migrated() {
        let blob = json!({
            "volume": 0.5,
            "repeat": "one",
            "shuffle": false,
            "crossfade": 3,
            "queue": songs(2),
            "originalQueue": songs(2),
            "queueIndex": 1,
            "currentSong": songs(2)[1]
        })
        .to_string();

        let state = PersistedPlayerState::from_json(&blob).unwrap();
        assert_eq!(state.version, CURRENT_STATE_VERSION);
        assert_eq!(state.repeat, RepeatMode::One);
        assert_eq!(state.crossfade, 3.0);
        assert_eq!(state.queue_index, 1);
    }

    #[test]
    fn enveloped_legacy_blob_is_migrated() {
        let blob = json!({
            "state": { "volume": 0.9, "queue": songs(3), "queueIndex": 0 },
            "version": 0
        })
        .to_string();

        let state = PersistedPlayerState::from_json(&blob).unwrap();
        assert_eq!(state.version, CURRENT_STATE_VERSION);
        assert_eq!(state.volume, 0.9);
        assert_eq!(state.queue.len(), 3);
        assert!(!state.shuffle);
    }

    #[test]
    fn future_version_is_rejected() {
        let blob = json!({ "version": 7, "queue": [] }).to_string();
        match PersistedPlayerState::from_json(&blob) {
            Err(PlaybackError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 7);
                assert_eq!(supported, 1);
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn non_object_blob_is_invalid() {
        assert!(matches!(
            PersistedPlayerState::from_json("[1, 2]"),
            Err(PlaybackError::InvalidState(_))
        ));
        assert!(matches!(
            PersistedPlayerState::from_json("{ nope"),
            Err(PlaybackError::Serialization(_))
        ));
    }

    #[test]
    fn restore_sanitizes_and_stays_paused() {
        let state = PersistedPlayerState {
            version: 1,
            volume: 4.0,
            repeat: RepeatMode::Off,
            shuffle: false,
            crossfade: 99.0,
            queue: songs(3),
            original_queue: Vec::new(),
            queue_index: 17,
            current_song: None,
        };

        let player = PlayerQueue::restore(state);
        assert_eq!(player.queue_index(), 2);
        assert_eq!(player.current_song().unwrap().id, "song-2");
        assert!(!player.is_playing());
        assert_eq!(player.volume(), 1.0);
        assert_eq!(player.crossfade(), 12.0);
        assert_eq!(player.original_queue().len(), 3);
    }

    #[test]
    fn restore_of_empty_queue_is_idle() {
        let state = PersistedPlayerState::from_json(r#"{"version":1,"queueIndex":3}"#).unwrap();
        let player = PlayerQueue::restore(state);
        assert!(player.current_song().is_none());
        assert_eq!(player.queue_index(), 0);
    }

    #[test]
    fn memory_store_persist_and_rehydrate() {
        let store = MemoryStateStore::new();
        assert!(PlayerQueue::rehydrate(&store).unwrap().is_none());

        let mut player = PlayerQueue::new();
        player.set_queue(songs(3), 1);
        player.persist(&store).unwrap();

        let restored = PlayerQueue::rehydrate(&store).unwrap().unwrap();
        assert_eq!(restored.queue(), player.queue());
        assert_eq!(restored.queue_index(), 1);
        assert!(!restored.is_playing());

        store.remove(PLAYER_STATE_BLOB).unwrap();
        assert!(store.load(PLAYER_STATE_BLOB).unwrap().is_none());
    }
}
