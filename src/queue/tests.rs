use super::*;
use proptest::prelude::*;

fn tracks(names: &[&str]) -> Vec<TrackRef> {
    names.iter().map(|n| TrackRef::from(*n)).collect()
}

#[test]
fn set_queue_uses_start_index_when_valid() {
    let mut q = QueueManager::new();
    q.set_queue(tracks(&["a", "b", "c"]), 2);
    assert_eq!(q.current_index(), Some(2));
    assert_eq!(q.current(), Some(TrackRef::from("c")));
}

#[test]
fn set_queue_clamps_out_of_range_start_to_zero() {
    let mut q = QueueManager::new();
    q.set_queue(tracks(&["a", "b"]), 9);
    assert_eq!(q.current_index(), Some(0));
}

#[test]
fn empty_queue_yields_no_track_everywhere() {
    let mut q = QueueManager::new();
    q.set_queue(Vec::new(), 3);
    assert_eq!(q.current(), None);
    assert_eq!(q.next(), None);
    assert_eq!(q.previous(), None);
    assert_eq!(q.current_index(), None);
    assert!(!q.has_next());
}

#[test]
fn next_and_previous_wrap_around() {
    let mut q = QueueManager::new();
    q.set_queue(tracks(&["a", "b", "c"]), 2);
    assert_eq!(q.next(), Some(TrackRef::from("a")));
    assert_eq!(q.previous(), Some(TrackRef::from("c")));
    assert_eq!(q.previous(), Some(TrackRef::from("b")));
}

#[test]
fn add_to_queue_skips_duplicate_paths() {
    let mut q = QueueManager::new();
    q.add_to_queue(TrackRef::from("/music/a.mp3"));
    q.add_to_queue(TrackRef::from("/music/b.mp3"));
    q.add_to_queue(TrackRef::new(std::path::PathBuf::from("/music/a.mp3")));
    assert_eq!(q.len(), 2);
}

#[test]
fn add_to_empty_queue_leaves_cursor_unset_until_next() {
    let mut q = QueueManager::new();
    q.add_to_queue(TrackRef::from("a"));
    assert_eq!(q.current(), None);
    assert_eq!(q.next(), Some(TrackRef::from("a")));
}

#[test]
fn set_current_index_ignores_out_of_range() {
    let mut q = QueueManager::new();
    q.set_queue(tracks(&["a", "b"]), 1);
    q.set_current_index(2);
    assert_eq!(q.current_index(), Some(1));
    q.set_current_index(0);
    assert_eq!(q.current_index(), Some(0));
}

#[test]
fn has_next_does_not_wrap() {
    let mut q = QueueManager::new();
    q.set_queue(tracks(&["a", "b"]), 0);
    assert!(q.has_next());
    q.set_current_index(1);
    assert!(!q.has_next());
}

proptest! {
    #[test]
    fn full_cycle_of_next_visits_each_index_once(len in 1usize..40, start in 0usize..40) {
        let names: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
        let mut q = QueueManager::new();
        q.set_queue(names.iter().map(|n| TrackRef::from(n.as_str())), start);
        let first = q.current_index().unwrap();

        let mut seen = vec![false; len];
        for _ in 0..len {
            q.next();
            let i = q.current_index().unwrap();
            prop_assert!(!seen[i]);
            seen[i] = true;
        }
        prop_assert!(seen.iter().all(|&s| s));
        prop_assert_eq!(q.current_index(), Some(first));
    }
}
