use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::model::display_for;
use super::scan::is_audio_file;
use super::*;
use crate::config::LibrarySettings;
use crate::track::TrackRef;

fn displays(tracks: &[LibraryTrack]) -> Vec<&str> {
    tracks.iter().map(|t| t.display.as_str()).collect()
}

#[test]
fn display_joins_artist_and_title() {
    assert_eq!(display_for("Song", Some("Artist")), "Artist - Song");
    assert_eq!(display_for("Song", Some("  Artist  ")), "Artist - Song");
    assert_eq!(display_for("Song", Some("  ")), "Song");
    assert_eq!(display_for("Song", None), "Song");
}

#[test]
fn audio_extensions_match_case_insensitively() {
    let settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.m4a"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a"), &settings));

    let dotted = LibrarySettings {
        extensions: vec![".OPUS".into(), "".into()],
        ..LibrarySettings::default()
    };
    assert!(is_audio_file(Path::new("x.opus"), &dotted));
    assert!(!is_audio_file(Path::new("x.mp3"), &dotted));
}

#[test]
fn scan_filters_and_sorts_untagged_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(displays(&tracks), vec!["A", "b"]);
    assert!(tracks.iter().all(|t| t.artist.is_none() && t.duration.is_none()));
}

#[test]
fn scan_skips_hidden_unless_asked() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"x").unwrap();
    fs::create_dir(dir.path().join(".cache")).unwrap();
    fs::write(dir.path().join(".cache").join("inner.mp3"), b"x").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(displays(&tracks), vec!["visible"]);

    let all = LibrarySettings {
        include_hidden: true,
        ..LibrarySettings::default()
    };
    assert_eq!(scan(dir.path(), &all).len(), 3);
}

#[test]
fn scan_honours_recursion_limits() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    fs::write(d1.join("one.mp3"), b"x").unwrap();
    fs::write(d2.join("two.mp3"), b"x").unwrap();

    let flat = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    assert_eq!(displays(&scan(dir.path(), &flat)), vec!["root"]);

    // Root is depth 0, so 2 reaches d1/* but not d1/d2/*.
    let capped = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    assert_eq!(displays(&scan(dir.path(), &capped)), vec!["one", "root"]);

    assert_eq!(scan(dir.path(), &LibrarySettings::default()).len(), 3);
}

#[test]
fn collect_keeps_argument_order_and_drops_missing() {
    let dir = tempdir().unwrap();
    let album = dir.path().join("album");
    fs::create_dir(&album).unwrap();
    fs::write(album.join("02.flac"), b"x").unwrap();
    fs::write(album.join("01.flac"), b"x").unwrap();
    let loose = dir.path().join("loose.bin");
    fs::write(&loose, b"x").unwrap();

    let args: Vec<PathBuf> = vec![loose.clone(), dir.path().join("missing.mp3"), album];
    let tracks = collect(&args, &LibrarySettings::default());

    assert_eq!(displays(&tracks), vec!["loose", "01", "02"]);
    assert_eq!(tracks[0].to_ref(), TrackRef::new(loose));
}
