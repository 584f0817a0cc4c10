use std::path::{Path, PathBuf};

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{LibraryTrack, display_for};

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read tags where possible. Unreadable files still produce an entry.
pub(super) fn describe(path: &Path) -> LibraryTrack {
    let mut track = LibraryTrack::bare(path.to_path_buf());

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            track.duration = Some(tagged.properties().duration());
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = non_empty(tag.title()) {
                    track.title = title;
                }
                track.artist = non_empty(tag.artist());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    track.display = display_for(&track.title, track.artist.as_deref());
    track
}

/// Walk `dir` and return its audio files sorted by display string.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<LibraryTrack> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<LibraryTrack> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .filter(|e| is_audio_file(e.path(), settings))
        .map(|e| describe(e.path()))
        .collect();

    tracks.sort_by_key(|t| t.display.to_lowercase());
    debug!(dir = %dir.display(), count = tracks.len(), "library scanned");
    tracks
}

/// Expand command-line arguments into tracks.
///
/// Directories are scanned; files are taken as given, whatever their
/// extension, in argument order.
pub fn collect(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<LibraryTrack> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            out.extend(scan(path, settings));
        } else if path.exists() {
            out.push(describe(path));
        } else {
            warn!(path = %path.display(), "no such file or directory");
        }
    }
    out
}
