use super::*;

#[test]
fn create_rejects_duplicates_and_blank_names() {
    let mut pm = PlaylistManager::new();
    pm.create_playlist("road trip").unwrap();
    assert!(matches!(
        pm.create_playlist("road trip"),
        Err(EngineError::Playlist(_))
    ));
    assert!(pm.create_playlist("   ").is_err());
    assert_eq!(pm.playlists().len(), 1);
}

#[test]
fn add_skips_tracks_already_listed() {
    let mut pm = PlaylistManager::new();
    pm.create_playlist("mix").unwrap();
    assert!(pm.add_track_to_playlist("mix", TrackRef::from("a.mp3")).unwrap());
    assert!(pm.add_track_to_playlist("mix", TrackRef::from("b.mp3")).unwrap());
    assert!(!pm.add_track_to_playlist("mix", TrackRef::from("a.mp3")).unwrap());

    let mix = pm.get("mix").unwrap();
    assert_eq!(
        mix.tracks(),
        &[TrackRef::from("a.mp3"), TrackRef::from("b.mp3")]
    );
}

#[test]
fn remove_by_path() {
    let mut pm = PlaylistManager::new();
    pm.create_playlist("mix").unwrap().add_track(TrackRef::from("a.mp3"));
    assert!(pm
        .remove_track_from_playlist("mix", &TrackRef::from("a.mp3"))
        .unwrap());
    assert!(!pm
        .remove_track_from_playlist("mix", &TrackRef::from("a.mp3"))
        .unwrap());
    assert!(pm.get("mix").unwrap().is_empty());
}

#[test]
fn unknown_playlist_is_an_error() {
    let mut pm = PlaylistManager::new();
    assert!(pm.add_track_to_playlist("nope", TrackRef::from("a.mp3")).is_err());
    assert!(pm
        .remove_track_from_playlist("nope", &TrackRef::from("a.mp3"))
        .is_err());
}

#[test]
fn delete_keeps_other_playlists_in_order() {
    let mut pm = PlaylistManager::new();
    for name in ["one", "two", "three"] {
        pm.create_playlist(name).unwrap();
    }
    assert!(pm.delete_playlist("two"));
    assert!(!pm.delete_playlist("two"));
    let names: Vec<&str> = pm.playlists().iter().map(Playlist::name).collect();
    assert_eq!(names, vec!["one", "three"]);
}
