//! Playback engine, its owner-thread handle and the audio backends.

mod backend;
mod disposer;
mod engine;
mod events;
mod player;
mod rodio_backend;
mod ticker;
mod types;

pub use backend::{
    AudioBackend, DecodeStream, OutputDevice, Pipeline, SharedPipeline, StopNotifier,
    lock_pipeline,
};
pub use engine::{Engine, EngineOptions};
pub use events::{EventHub, SubscriptionId};
pub use player::Player;
pub use rodio_backend::RodioBackend;
pub use ticker::Ticker;
pub use types::*;

#[cfg(test)]
mod mock;
