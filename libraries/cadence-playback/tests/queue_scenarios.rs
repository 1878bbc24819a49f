//! End-to-end queue scenarios, including persistence to disk.

use cadence_core::Song;
use cadence_playback::{
    FileStateStore, PersistedPlayerState, PlaybackError, PlayerQueue, PlayerStatus, RepeatMode,
    StateStore, PLAYER_STATE_BLOB,
};
use tempfile::TempDir;

fn song(id: &str) -> Song {
    Song {
        id: id.to_string(),
        title: id.to_uppercase(),
        duration: 180,
        audio_url: format!("https://example.com/audio/{id}.mp3"),
        cover: String::new(),
        genre: "Jazz".to_string(),
        mood: "Chill".to_string(),
        play_count: 0,
        artist_id: "artist-1".to_string(),
        artist_name: "Artist 1".to_string(),
        album_id: None,
        album_name: None,
        has_preview: false,
        is_full_song: true,
        external_url: None,
        license: None,
    }
}

fn abc() -> Vec<Song> {
    vec![song("a"), song("b"), song("c")]
}

fn current(player: &PlayerQueue) -> &str {
    player.current_song().map(|s| s.id.as_str()).unwrap_or("")
}

#[test]
fn non_repeating_queue_stops_at_the_end() {
    let mut player = PlayerQueue::new();
    player.set_queue(abc(), 0);
    player.set_repeat(RepeatMode::Off);

    player.play_next();
    assert_eq!(player.queue_index(), 1);
    assert_eq!(current(&player), "b");

    player.play_next();
    assert_eq!(player.queue_index(), 2);
    assert_eq!(current(&player), "c");

    player.play_next();
    assert_eq!(player.queue_index(), 2);
    assert!(!player.is_playing());
    assert_eq!(player.state(), PlayerStatus::Paused);
}

#[test]
fn removing_the_only_song_clears_the_player() {
    let mut player = PlayerQueue::new();
    player.set_queue(vec![song("solo")], 0);

    player.remove_from_queue(player.queue_index());

    assert!(player.current_song().is_none());
    assert!(player.queue().is_empty());
    assert_eq!(player.state(), PlayerStatus::Idle);
}

#[test]
fn songs_queued_after_shuffling_an_empty_queue_survive_unshuffle() {
    let mut player = PlayerQueue::new();
    player.toggle_shuffle();
    assert!(player.is_shuffled());

    for s in abc() {
        player.add_to_queue(s);
    }
    player.toggle_shuffle();

    assert!(!player.is_shuffled());
    assert_eq!(player.queue(), abc().as_slice());
    assert_eq!(player.original_queue(), abc().as_slice());
    assert_eq!(current(&player), "a");
}

#[test]
fn player_survives_restart_through_file_store() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path().join("state")).unwrap();

    let mut player = PlayerQueue::new();
    player.set_queue(abc(), 1);
    player.set_volume(0.3);
    player.set_crossfade(5.0);
    player.set_repeat(RepeatMode::One);
    player.toggle_shuffle();
    player.persist(&store).unwrap();

    assert!(dir.path().join("state/player-storage.json").exists());

    let restored = PlayerQueue::rehydrate(&store).unwrap().unwrap();
    assert_eq!(restored.queue(), player.queue());
    assert_eq!(restored.original_queue(), player.original_queue());
    assert_eq!(current(&restored), "b");
    assert_eq!(restored.volume(), 0.3);
    assert_eq!(restored.crossfade(), 5.0);
    assert_eq!(restored.repeat(), RepeatMode::One);
    assert!(restored.is_shuffled());
    assert_eq!(restored.state(), PlayerStatus::Paused);

    // unshuffling after a restart still restores the original order
    let mut restored = restored;
    restored.toggle_shuffle();
    assert_eq!(restored.queue(), abc().as_slice());
    assert_eq!(current(&restored), "b");
}

#[test]
fn legacy_blob_on_disk_is_migrated() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path()).unwrap();

    let legacy = serde_json::json!({
        "state": {
            "volume": 0.6,
            "repeat": "all",
            "shuffle": false,
            "crossfade": 0,
            "queue": abc(),
            "originalQueue": abc(),
            "queueIndex": 2,
            "currentSong": song("c")
        },
        "version": 0
    });
    store.save(PLAYER_STATE_BLOB, &legacy.to_string()).unwrap();

    let player = PlayerQueue::rehydrate(&store).unwrap().unwrap();
    assert_eq!(current(&player), "c");
    assert_eq!(player.repeat(), RepeatMode::All);

    // saving again writes the current layout
    player.persist(&store).unwrap();
    let blob = store.load(PLAYER_STATE_BLOB).unwrap().unwrap();
    let state = PersistedPlayerState::from_json(&blob).unwrap();
    assert_eq!(state.version, 1);
    assert!(blob.contains("\"version\":1"));
}

#[test]
fn newer_blob_is_refused() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path()).unwrap();
    store
        .save(PLAYER_STATE_BLOB, r#"{"version": 2, "queue": []}"#)
        .unwrap();

    assert!(matches!(
        PlayerQueue::rehydrate(&store),
        Err(PlaybackError::UnsupportedVersion { found: 2, .. })
    ));
}

#[test]
fn file_store_rejects_path_like_names() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path()).unwrap();

    assert!(matches!(
        store.save("../escape", "{}"),
        Err(PlaybackError::InvalidBlobName(_))
    ));
    assert!(store.load("").is_err());
    assert!(store.load("missing").unwrap().is_none());
    store.remove("missing").unwrap();
}
