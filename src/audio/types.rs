//! Audio-related small types and handles.
//!
//! This module defines the commands processed by the engine's owner thread,
//! the events it publishes and the playback snapshot shared with callers.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::Result;
use crate::mode::PlayMode;
use crate::playlist::Playlist;
use crate::track::TrackRef;

/// Channel used by the owner thread to answer a caller waiting on a command.
pub type Reply = Sender<Result<()>>;

/// Identifies one playback session; device notifications carry it so that a
/// stop raised by an old device cannot affect its successor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

#[derive(Debug)]
pub enum Command {
    /// Start playing the given track.
    Play { track: TrackRef, reply: Reply },
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback; suppresses auto-advance.
    Stop,
    /// Move to an absolute position in the current track.
    Seek(Duration),
    /// Replace the queue and play from `start`.
    SetQueue {
        tracks: Vec<TrackRef>,
        start: usize,
        reply: Reply,
    },
    /// Replace the queue with a playlist's tracks and play from `start`.
    LoadPlaylist {
        playlist: Playlist,
        start: usize,
        reply: Reply,
    },
    /// Append a track unless already queued.
    AddToQueue(TrackRef),
    /// Jump to a queue position and play it.
    PlayAtIndex { index: usize, reply: Reply },
    /// Switch the active play mode.
    SetPlayMode(PlayMode),
    /// Skip forward according to the play mode.
    Next { reply: Reply },
    /// Skip back according to the play mode.
    Previous { reply: Reply },
    /// Raised by an output device (on its own thread) when it stops.
    DeviceStopped {
        session: SessionId,
        error: Option<String>,
    },
    /// Periodic position refresh.
    Tick,
    /// Stop playback and exit the owner thread.
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    PlayStateChanged(bool),
    PositionChanged { current: Duration, total: Duration },
    TrackChanged(TrackRef),
    /// The device stopped on its own; `error` is set when it failed.
    PlaybackStopped { error: Option<String> },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    PlayState,
    Position,
    Track,
    Stopped,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::PlayState,
        EventKind::Position,
        EventKind::Track,
        EventKind::Stopped,
    ];
}

impl PlayerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::PlayStateChanged(_) => EventKind::PlayState,
            PlayerEvent::PositionChanged { .. } => EventKind::Position,
            PlayerEvent::TrackChanged(_) => EventKind::Track,
            PlayerEvent::PlaybackStopped { .. } => EventKind::Stopped,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with callers.
pub struct PlaybackInfo {
    pub state: PlaybackState,
    /// Track of the active session, if any.
    pub track: Option<TrackRef>,
    pub position: Duration,
    pub total: Duration,
    pub mode: PlayMode,
    pub queue_len: usize,
    pub queue_index: Option<usize>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
