//! Integration tests for the playlists slice
//!
//! Covers creation order, duplicate-free song lists, reordering and
//! no-op behavior on unknown playlists.


use cadence_core::types::PlaylistId;
use cadence_storage::playlists;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let playlist = playlists::create(pool, "Road Trip", Some("long drives"))
        .await
        .expect("Failed to create playlist");

    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.description.as_deref(), Some("long drives"));
    assert!(playlist.songs.is_empty());

    let retrieved = playlists::get(pool, &playlist.id).await.unwrap().unwrap();
    assert_eq!(retrieved, playlist);
}

#[tokio::test]
async fn test_list_in_creation_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    playlists::create(pool, "First", None).await.unwrap();
    playlists::create(pool, "Second", None).await.unwrap();
    playlists::create(pool, "Third", None).await.unwrap();

    let names: Vec<String> = playlists::list(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_songs_are_unique_and_ordered() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let playlist = playlists::create(pool, "Mix", None).await.unwrap();

    assert!(playlists::add_song(pool, &playlist.id, &test_song("a")).await.unwrap());
    assert!(playlists::add_song(pool, &playlist.id, &test_song("b")).await.unwrap());
    assert!(!playlists::add_song(pool, &playlist.id, &test_song("a")).await.unwrap());

    let stored = playlists::get(pool, &playlist.id).await.unwrap().unwrap();
    assert_eq!(ids(&stored.songs), ["a", "b"]);
    assert!(stored.updated_at >= stored.created_at);
    assert_eq!(stored.total_duration_secs(), 400);
}

#[tokio::test]
async fn test_reorder_and_remove_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let playlist = playlists::create(pool, "Mix", None).await.unwrap();
    for id in ["a", "b", "c", "d"] {
        playlists::add_song(pool, &playlist.id, &test_song(id)).await.unwrap();
    }

    assert!(playlists::reorder_songs(pool, &playlist.id, 0, 2).await.unwrap());
    let stored = playlists::get(pool, &playlist.id).await.unwrap().unwrap();
    assert_eq!(ids(&stored.songs), ["b", "c", "a", "d"]);

    assert!(!playlists::reorder_songs(pool, &playlist.id, 1, 9).await.unwrap());

    assert!(playlists::remove_song(pool, &playlist.id, "c").await.unwrap());
    assert!(!playlists::remove_song(pool, &playlist.id, "c").await.unwrap());
    let stored = playlists::get(pool, &playlist.id).await.unwrap().unwrap();
    assert_eq!(ids(&stored.songs), ["b", "a", "d"]);
}

#[tokio::test]
async fn test_rename_clear_and_delete() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let playlist = playlists::create(pool, "Old", None).await.unwrap();
    playlists::add_song(pool, &playlist.id, &test_song("a")).await.unwrap();

    assert!(playlists::rename(pool, &playlist.id, "New").await.unwrap());
    assert!(playlists::clear(pool, &playlist.id).await.unwrap());

    let stored = playlists::get(pool, &playlist.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "New");
    assert!(stored.songs.is_empty());

    assert!(playlists::delete(pool, &playlist.id).await.unwrap());
    assert!(playlists::get(pool, &playlist.id).await.unwrap().is_none());
    assert!(!playlists::delete(pool, &playlist.id).await.unwrap());
}

#[tokio::test]
async fn test_unknown_playlist_mutations_are_noops() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let missing = PlaylistId::new("missing");

    assert!(!playlists::rename(pool, &missing, "x").await.unwrap());
    assert!(!playlists::add_song(pool, &missing, &test_song("a")).await.unwrap());
    assert!(!playlists::remove_song(pool, &missing, "a").await.unwrap());
    assert!(!playlists::reorder_songs(pool, &missing, 0, 0).await.unwrap());
    assert!(!playlists::clear(pool, &missing).await.unwrap());
    assert!(playlists::list(pool).await.unwrap().is_empty());
}
