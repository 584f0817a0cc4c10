//! Local-file audio playback engine: a queue, pluggable play modes, a
//! per-session equalizer pipeline and a single-owner playback state machine.

pub mod audio;
pub mod config;
pub mod dsp;
pub mod error;
pub mod library;
pub mod mode;
pub mod playlist;
pub mod queue;
pub mod runtime;
pub mod track;

pub use audio::{Player, PlayerEvent};
pub use error::{EngineError, Result};
pub use mode::PlayMode;
pub use playlist::{Playlist, PlaylistManager};
pub use queue::QueueManager;
pub use track::TrackRef;
