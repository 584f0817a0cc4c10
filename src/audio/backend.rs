//! Collaborator contracts: the decode-stream provider and the output device.
//!
//! The engine never touches a codec or a sound card directly. A backend opens
//! a `DecodeStream` for a track, the engine wraps it with an equalizer into a
//! shared `Pipeline`, and the backend binds an `OutputDevice` that pulls from
//! that pipeline on its own thread.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::dsp::Equalizer;
use crate::error::Result;
use crate::track::TrackRef;

use super::types::{Command, SessionId};

/// A decoded, seekable source of interleaved `f32` samples.
pub trait DecodeStream: Send {
    fn channels(&self) -> u16;

    fn sample_rate(&self) -> u32;

    /// Fill `buf` with interleaved samples and return how many were written.
    /// Zero means the stream is exhausted.
    fn read(&mut self, buf: &mut [f32]) -> usize;

    fn position(&self) -> Duration;

    /// Total length; `Duration::ZERO` when unknown.
    fn total(&self) -> Duration;

    fn seek(&mut self, pos: Duration) -> Result<()>;
}

/// Sound output bound to one pipeline for its whole life.
pub trait OutputDevice: Send {
    fn play(&mut self);

    fn pause(&mut self);

    /// Halt output. Must not raise a stop notification by itself.
    fn stop(&mut self);
}

pub trait AudioBackend {
    fn open(&mut self, track: &TrackRef) -> Result<Box<dyn DecodeStream>>;

    /// Create a paused device that reads from `pipeline` and reports through
    /// `on_stop` when it runs dry or fails.
    fn create_device(
        &mut self,
        pipeline: SharedPipeline,
        on_stop: StopNotifier,
    ) -> Result<Box<dyn OutputDevice>>;
}

/// Decode stream followed by the equalizer.
pub struct Pipeline {
    stream: Box<dyn DecodeStream>,
    equalizer: Equalizer,
}

pub type SharedPipeline = Arc<Mutex<Pipeline>>;

impl Pipeline {
    pub fn new(stream: Box<dyn DecodeStream>, equalizer: Equalizer) -> Self {
        Self { stream, equalizer }
    }

    pub fn shared(self) -> SharedPipeline {
        Arc::new(Mutex::new(self))
    }

    pub fn channels(&self) -> u16 {
        self.stream.channels()
    }

    pub fn sample_rate(&self) -> u32 {
        self.stream.sample_rate()
    }

    /// Pull equalized samples into `buf`; zero at end of stream.
    pub fn read(&mut self, buf: &mut [f32]) -> usize {
        let n = self.stream.read(buf);
        self.equalizer.process(buf, n);
        n
    }

    pub fn position(&self) -> Duration {
        self.stream.position()
    }

    pub fn total(&self) -> Duration {
        self.stream.total()
    }

    pub fn seek(&mut self, pos: Duration) -> Result<()> {
        self.stream.seek(pos)?;
        self.equalizer.realign();
        Ok(())
    }
}

/// Lock a pipeline, recovering the data if a reader panicked mid-read.
pub fn lock_pipeline(pipeline: &SharedPipeline) -> MutexGuard<'_, Pipeline> {
    pipeline.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lets a device report that it stopped, from whatever thread it runs on.
///
/// The report is queued to the engine's owner thread; it never touches
/// engine state directly.
#[derive(Debug, Clone)]
pub struct StopNotifier {
    tx: Sender<Command>,
    session: SessionId,
}

impl StopNotifier {
    pub(crate) fn new(tx: Sender<Command>, session: SessionId) -> Self {
        Self { tx, session }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// `None` signals a natural end of stream.
    pub fn notify(&self, error: Option<String>) {
        // The owner may already be gone during shutdown.
        let _ = self.tx.send(Command::DeviceStopped {
            session: self.session,
            error,
        });
    }
}
