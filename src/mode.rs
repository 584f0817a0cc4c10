//! Play modes and the strategies that pick the next/previous track.
//!
//! A strategy only talks to the queue through its public operations; the
//! shuffle strategy is the only one that carries state of its own.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::queue::QueueManager;
use crate::track::TrackRef;

mod shuffle;
mod strategy;

pub use shuffle::ShuffleMode;
pub use strategy::{RepeatOneMode, SequentialMode, StopAfterCurrentMode};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// Walk the queue in order, wrapping at the end.
    #[default]
    #[serde(alias = "loop-all", alias = "loop_all", alias = "sequence")]
    Sequential,
    /// Walk a random permutation of the queue.
    #[serde(alias = "random")]
    Shuffle,
    /// Replay the current track.
    #[serde(alias = "repeat_one", alias = "loop-one", alias = "loop_one")]
    RepeatOne,
    /// Play to the end of the queue, then stop.
    #[serde(alias = "stop_after_current", alias = "no-loop", alias = "no_loop")]
    StopAfterCurrent,
}

impl PlayMode {
    pub const ALL: [PlayMode; 4] = [
        PlayMode::Sequential,
        PlayMode::Shuffle,
        PlayMode::RepeatOne,
        PlayMode::StopAfterCurrent,
    ];

    /// Build the strategy for this mode. `rng` is only consumed by shuffle.
    pub fn strategy(self, rng: StdRng) -> Box<dyn PlayModeStrategy> {
        match self {
            PlayMode::Sequential => Box::new(SequentialMode),
            PlayMode::Shuffle => Box::new(ShuffleMode::new(rng)),
            PlayMode::RepeatOne => Box::new(RepeatOneMode),
            PlayMode::StopAfterCurrent => Box::new(StopAfterCurrentMode),
        }
    }

    /// The mode after this one, wrapping around.
    pub fn cycle(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayMode::Sequential => "sequential",
            PlayMode::Shuffle => "shuffle",
            PlayMode::RepeatOne => "repeat-one",
            PlayMode::StopAfterCurrent => "stop-after-current",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "sequential" | "sequence" | "loop-all" => Ok(PlayMode::Sequential),
            "shuffle" | "random" => Ok(PlayMode::Shuffle),
            "repeat-one" | "loop-one" => Ok(PlayMode::RepeatOne),
            "stop-after-current" | "no-loop" => Ok(PlayMode::StopAfterCurrent),
            other => Err(format!("unknown play mode: {other}")),
        }
    }
}

/// Policy mapping "next"/"previous" requests onto queue operations.
pub trait PlayModeStrategy: Send {
    fn next_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef>;

    fn previous_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef>;

    /// Prepare internal state against the current queue ahead of the first
    /// request. Stateless strategies have nothing to do.
    fn prime(&mut self, _queue: &QueueManager) {}
}
