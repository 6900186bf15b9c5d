//! Queue store scenarios

use cadence_core::types::{RepeatMode, Song};
use cadence_playback::{PlayerStore, PositionSource, PreviousOutcome, QueueState};

fn song(id: &str) -> Song {
    Song::new(id, format!("Song {id}"), "Artist")
        .with_stream_url(format!("https://cdn.test/{id}.mp4"))
}

fn ids(state: &QueueState) -> Vec<String> {
    state.queue().iter().map(|s| s.id.clone()).collect()
}

fn current(store: &PlayerStore) -> Option<String> {
    store.read(|s| s.current_song().map(|song| song.id.clone()))
}

#[test]
fn previous_from_start_position_moves_then_wraps() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("s1"), song("s2"), song("s3")], 1);

    assert_eq!(store.skip_to_previous(), PreviousOutcome::Moved);
    assert_eq!(current(&store).as_deref(), Some("s1"));

    assert_eq!(store.skip_to_previous(), PreviousOutcome::Moved);
    assert_eq!(current(&store).as_deref(), Some("s3"));
}

#[test]
fn removing_earlier_entry_keeps_current_identity() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("A"), song("B"), song("C")], 1);

    store.remove_from_queue(0);

    let state = store.snapshot();
    assert_eq!(ids(&state), ["B", "C"]);
    assert_eq!(state.current_index(), 0);
    assert_eq!(current(&store).as_deref(), Some("B"));
}

#[test]
fn building_a_queue_incrementally() {
    let store = PlayerStore::new();
    store.add_to_queue(song("a"));
    store.add_to_queue(song("c"));
    store.play_next(song("b"));

    let state = store.snapshot();
    assert_eq!(ids(&state), ["a", "b", "c"]);
    assert_eq!(state.current_index(), 0);
}

#[test]
fn duplicate_ids_are_kept_in_order() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("a"), song("a"), song("b")], 0);

    let epoch = store.read(QueueState::selection_epoch);
    assert!(store.skip_to_next());
    assert_eq!(current(&store).as_deref(), Some("a"));
    assert_eq!(store.read(QueueState::current_index), 1);
    assert!(store.read(QueueState::selection_epoch) > epoch);
}

#[test]
fn seek_then_restart_with_previous() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("a"), song("b")], 1);
    store.update(|s| s.record_progress(Some(0), 240_000));
    store.update(|s| s.seek_to(120_000));
    assert_eq!(
        store.read(QueueState::position_source),
        PositionSource::OptimisticSeek
    );

    assert_eq!(store.skip_to_previous(), PreviousOutcome::Restarted);
    assert_eq!(current(&store).as_deref(), Some("b"));
    assert_eq!(store.read(QueueState::position_ms), 0);
}

#[test]
fn reorder_then_remove_current() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("a"), song("b"), song("c"), song("d")], 1);

    assert!(store.reorder_queue(1, 3));
    assert_eq!(store.read(QueueState::current_index), 3);

    store.remove_from_queue(3);
    let state = store.snapshot();
    assert_eq!(ids(&state), ["a", "c", "d"]);
    assert_eq!(state.current_index(), 2);
    assert_eq!(current(&store).as_deref(), Some("d"));
}

#[test]
fn out_of_range_requests_are_noops() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("a"), song("b")], 0);

    assert!(!store.skip_to_index(2));
    assert!(store.remove_from_queue(7).is_none());
    assert!(!store.reorder_queue(0, 9));

    let state = store.snapshot();
    assert_eq!(ids(&state), ["a", "b"]);
    assert_eq!(state.current_index(), 0);
}

#[test]
fn empty_queue_operations_are_noops() {
    let store = PlayerStore::new();
    assert!(!store.skip_to_next());
    assert_eq!(store.skip_to_previous(), PreviousOutcome::Unchanged);
    assert!(!store.skip_to_index(0));
    store.play();

    let state = store.snapshot();
    assert!(state.is_empty());
    assert!(!state.is_playing());
}

#[test]
fn persisted_state_survives_restart_paused() {
    let store = PlayerStore::new();
    store.set_queue(vec![song("a"), song("b"), song("c")], 2);
    store.toggle_shuffle();
    store.update(|s| s.set_repeat(RepeatMode::All));
    store.play();
    store.update(|s| s.record_progress(Some(5_000), 100_000));

    let json = serde_json::to_string(&store.persisted()).unwrap();
    let restored = PlayerStore::restore(serde_json::from_str(&json).unwrap());

    let state = restored.snapshot();
    assert_eq!(ids(&state), ["a", "b", "c"]);
    assert_eq!(state.current_index(), 2);
    assert!(state.shuffle());
    assert_eq!(state.repeat(), RepeatMode::All);
    assert!(!state.is_playing());
    assert_eq!(state.position_ms(), 0);
}
