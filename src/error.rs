//! Error types shared by the engine, its backends and the runtime.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The decode stream for a track could not be created.
    #[error("cannot open {path:?}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// The output device failed to start or reported a failure.
    #[error("output device error: {0}")]
    Device(String),

    /// Repositioning the decode stream failed.
    #[error("seek failed: {0}")]
    Seek(String),

    /// The engine's owner thread is no longer running.
    #[error("playback engine is not running")]
    Disconnected,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("playlist error: {0}")]
    Playlist(String),
}

impl EngineError {
    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
