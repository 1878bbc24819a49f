//! Integration tests for the playlists slice


use cadence_core::{CreatePlaylist, UpdatePlaylist};
use cadence_storage::playlists;
use cadence_storage::StorageError;
use test_helpers::*;

fn new_playlist(owner: &cadence_core::UserId, name: &str, is_public: bool) -> CreatePlaylist {
    CreatePlaylist {
        owner_id: owner.clone(),
        name: name.to_string(),
        description: None,
        is_public,
    }
}

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;

    let created = playlists::create(pool, new_playlist(&owner, "Road trip", false))
        .await
        .unwrap();
    assert_eq!(created.cover, playlists::DEFAULT_COVER);
    assert!(!created.is_public);

    let fetched = playlists::get(pool, &created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Road trip");
    assert_eq!(fetched.songs, Some(vec![]));
}

#[tokio::test]
async fn test_songs_append_in_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;
    let playlist = playlists::create(pool, new_playlist(&owner, "Mix", true))
        .await
        .unwrap();

    for id in ["a", "b", "c"] {
        playlists::add_song(pool, &playlist.id, &owner, id).await.unwrap();
    }

    let songs = playlists::get_songs(pool, &playlist.id).await.unwrap();
    let order: Vec<_> = songs.iter().map(|s| (s.song_id.as_str(), s.position)).collect();
    assert_eq!(order, vec![("a", 1), ("b", 2), ("c", 3)]);

    let dup = playlists::add_song(pool, &playlist.id, &owner, "b").await;
    assert!(matches!(dup, Err(StorageError::Duplicate(_))));
}

#[tokio::test]
async fn test_reorder_assigns_new_positions() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;
    let playlist = playlists::create(pool, new_playlist(&owner, "Mix", true))
        .await
        .unwrap();
    for id in ["a", "b", "c"] {
        playlists::add_song(pool, &playlist.id, &owner, id).await.unwrap();
    }

    let order = vec!["c".to_string(), "a".to_string(), "b".to_string()];
    let songs = playlists::reorder(pool, &playlist.id, &owner, &order)
        .await
        .unwrap();

    let ids: Vec<_> = songs.iter().map(|s| s.song_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(songs[0].position, 1);
}

#[tokio::test]
async fn test_non_owner_cannot_modify() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;
    let intruder = create_test_user_id(pool, "intruder@example.com").await;
    let playlist = playlists::create(pool, new_playlist(&owner, "Mine", true))
        .await
        .unwrap();

    let update = playlists::update(
        pool,
        &playlist.id,
        &intruder,
        UpdatePlaylist {
            name: Some("Theirs".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(update, Err(StorageError::PermissionDenied(_))));

    let add = playlists::add_song(pool, &playlist.id, &intruder, "x").await;
    assert!(matches!(add, Err(StorageError::PermissionDenied(_))));

    let delete = playlists::delete(pool, &playlist.id, &intruder).await;
    assert!(matches!(delete, Err(StorageError::PermissionDenied(_))));
}

#[tokio::test]
async fn test_missing_playlist_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;
    let missing = cadence_core::PlaylistId::new("missing");

    assert!(playlists::get(pool, &missing).await.unwrap().is_none());
    let result = playlists::delete(pool, &missing, &owner).await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_and_delete_cascades_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;
    let playlist = playlists::create(pool, new_playlist(&owner, "Old", true))
        .await
        .unwrap();
    playlists::add_song(pool, &playlist.id, &owner, "a").await.unwrap();

    let updated = playlists::update(
        pool,
        &playlist.id,
        &owner,
        UpdatePlaylist {
            name: Some("New".to_string()),
            is_public: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "New");
    assert!(!updated.is_public);
    assert_eq!(updated.songs.as_ref().map(Vec::len), Some(1));

    playlists::delete(pool, &playlist.id, &owner).await.unwrap();
    assert!(playlists::get_songs(pool, &playlist.id).await.unwrap().is_empty());
    assert!(playlists::list_by_owner(pool, &owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_missing_song_is_lenient() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user_id(pool, "owner@example.com").await;
    let playlist = playlists::create(pool, new_playlist(&owner, "Mix", true))
        .await
        .unwrap();

    let removed = playlists::remove_song(pool, &playlist.id, &owner, "ghost")
        .await
        .unwrap();
    assert!(!removed);
}
