//! Named, in-memory track lists that can be loaded into the play queue.

use crate::error::{EngineError, Result};
use crate::track::TrackRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    name: String,
    tracks: Vec<TrackRef>,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Append `track` unless the same path is already listed.
    pub fn add_track(&mut self, track: TrackRef) -> bool {
        if self.tracks.contains(&track) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn remove_track(&mut self, track: &TrackRef) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t != track);
        self.tracks.len() != before
    }
}

/// Playlists in creation order, looked up by exact name.
#[derive(Debug, Default)]
pub struct PlaylistManager {
    playlists: Vec<Playlist>,
}

impl PlaylistManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_playlist(&mut self, name: &str) -> Result<&mut Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Playlist("playlist name is empty".to_string()));
        }
        if self.get(name).is_some() {
            return Err(EngineError::Playlist(format!(
                "playlist {name:?} already exists"
            )));
        }
        self.playlists.push(Playlist::new(name));
        let last = self.playlists.len() - 1;
        Ok(&mut self.playlists[last])
    }

    pub fn delete_playlist(&mut self, name: &str) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|p| p.name != name);
        self.playlists.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| EngineError::Playlist(format!("no playlist named {name:?}")))
    }

    /// Returns whether the track was added; duplicates are skipped.
    pub fn add_track_to_playlist(&mut self, name: &str, track: TrackRef) -> Result<bool> {
        Ok(self.get_mut(name)?.add_track(track))
    }

    pub fn remove_track_from_playlist(&mut self, name: &str, track: &TrackRef) -> Result<bool> {
        Ok(self.get_mut(name)?.remove_track(track))
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }
}

#[cfg(test)]
mod tests;
