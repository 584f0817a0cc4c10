//! Ordered track list with a cursor.
//!
//! The queue never lets its cursor point outside the list: out-of-range
//! requests are clamped or ignored, and operations on an empty queue return
//! `None` rather than failing.

use crate::track::TrackRef;

#[derive(Debug, Default, Clone)]
pub struct QueueManager {
    tracks: Vec<TrackRef>,
    current: Option<usize>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents; the cursor goes to `start_index`, or 0 when that
    /// index is out of range.
    pub fn set_queue(&mut self, tracks: impl IntoIterator<Item = TrackRef>, start_index: usize) {
        self.tracks = tracks.into_iter().collect();
        self.current = if self.tracks.is_empty() {
            None
        } else if start_index < self.tracks.len() {
            Some(start_index)
        } else {
            Some(0)
        };
    }

    pub fn current(&self) -> Option<TrackRef> {
        self.current.and_then(|i| self.tracks.get(i)).cloned()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Advance with wrap-around. An unset cursor lands on the first track.
    pub fn next(&mut self) -> Option<TrackRef> {
        if self.tracks.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            _ => 0,
        };
        self.current = Some(next);
        self.current()
    }

    /// Retreat with wrap-around. An unset cursor lands on the last track.
    pub fn previous(&mut self) -> Option<TrackRef> {
        if self.tracks.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => self.tracks.len() - 1,
        };
        self.current = Some(prev);
        self.current()
    }

    /// Append `track` unless the same path is already queued.
    pub fn add_to_queue(&mut self, track: TrackRef) {
        if !self.tracks.contains(&track) {
            self.tracks.push(track);
        }
    }

    /// Move the cursor; out-of-range indices are ignored.
    pub fn set_current_index(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.current = Some(index);
        }
    }

    /// Whether a track follows the cursor without wrapping.
    pub fn has_next(&self) -> bool {
        match self.current {
            Some(i) => i + 1 < self.tracks.len(),
            None => !self.tracks.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackRef> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests;
