use std::path::PathBuf;
use std::time::Duration;

use crate::track::TrackRef;

#[derive(Debug, Clone)]
pub struct LibraryTrack {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

impl LibraryTrack {
    /// Entry with no tag data; the title is the file stem.
    pub fn bare(path: PathBuf) -> Self {
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            display: title.clone(),
            path,
            title,
            artist: None,
            duration: None,
        }
    }

    pub fn to_ref(&self) -> TrackRef {
        TrackRef::new(self.path.clone())
    }
}

/// `Artist - Title`, or just the title when the artist is unknown.
pub(super) fn display_for(title: &str, artist: Option<&str>) -> String {
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => format!("{a} - {title}"),
        None => title.to_string(),
    }
}
