//! Integration tests for the favorites slice


use cadence_storage::favorites;
use test_helpers::*;

#[tokio::test]
async fn test_newest_favorite_comes_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    assert!(favorites::add(pool, &test_song("a")).await.unwrap());
    assert!(favorites::add(pool, &test_song("b")).await.unwrap());
    assert!(favorites::add(pool, &test_song("c")).await.unwrap());

    let list = favorites::list(pool).await.unwrap();
    assert_eq!(ids(&list), ["c", "b", "a"]);
    assert_eq!(list[0].stream_url.as_deref(), Some("https://cdn.test/c.mp4"));
}

#[tokio::test]
async fn test_duplicate_add_keeps_first_place() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    favorites::add(pool, &test_song("a")).await.unwrap();
    favorites::add(pool, &test_song("b")).await.unwrap();
    assert!(!favorites::add(pool, &test_song("a")).await.unwrap());

    let list = favorites::list(pool).await.unwrap();
    assert_eq!(ids(&list), ["b", "a"]);
}

#[tokio::test]
async fn test_toggle_adds_then_removes() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let song = test_song("a");

    assert!(favorites::toggle(pool, &song).await.unwrap());
    assert!(favorites::contains(pool, "a").await.unwrap());

    assert!(!favorites::toggle(pool, &song).await.unwrap());
    assert!(!favorites::contains(pool, "a").await.unwrap());
}

#[tokio::test]
async fn test_remove_and_clear() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    favorites::add(pool, &test_song("a")).await.unwrap();
    favorites::add(pool, &test_song("b")).await.unwrap();

    assert!(favorites::remove(pool, "a").await.unwrap());
    assert!(!favorites::remove(pool, "missing").await.unwrap());
    assert_eq!(ids(&favorites::list(pool).await.unwrap()), ["b"]);

    favorites::clear(pool).await.unwrap();
    assert!(favorites::list(pool).await.unwrap().is_empty());
}
