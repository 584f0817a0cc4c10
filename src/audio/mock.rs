//! In-memory backend for engine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::error::{EngineError, Result};
use crate::track::TrackRef;

use super::backend::{AudioBackend, DecodeStream, OutputDevice, SharedPipeline, StopNotifier};

pub const RATE: u32 = 1_000;
pub const CHANNELS: u16 = 2;
pub const TRACK_LEN: Duration = Duration::from_secs(180);

#[derive(Default)]
pub struct MockState {
    pub opened: Vec<TrackRef>,
    pub notifiers: Vec<StopNotifier>,
    pub device_calls: Vec<&'static str>,
    pub fail_devices: bool,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
    pub live: Arc<AtomicUsize>,
    pub open_delay: Duration,
}

impl MockBackend {
    pub fn with_open_delay(delay: Duration) -> Self {
        Self {
            open_delay: delay,
            ..Self::default()
        }
    }

    pub fn live_devices(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> Vec<TrackRef> {
        self.state.lock().unwrap().opened.clone()
    }

    pub fn last_notifier(&self) -> StopNotifier {
        self.state.lock().unwrap().notifiers.last().cloned().unwrap()
    }

    pub fn notifier(&self, i: usize) -> StopNotifier {
        self.state.lock().unwrap().notifiers[i].clone()
    }

    pub fn device_calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().device_calls.clone()
    }
}

impl AudioBackend for MockBackend {
    fn open(&mut self, track: &TrackRef) -> Result<Box<dyn DecodeStream>> {
        if !self.open_delay.is_zero() {
            thread::sleep(self.open_delay);
        }
        if track.path().to_string_lossy().contains("corrupt") {
            return Err(EngineError::open(track.path(), "unsupported format"));
        }
        self.state.lock().unwrap().opened.push(track.clone());
        Ok(Box::new(MockStream::new(TRACK_LEN)))
    }

    fn create_device(
        &mut self,
        _pipeline: SharedPipeline,
        on_stop: StopNotifier,
    ) -> Result<Box<dyn OutputDevice>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_devices {
            return Err(EngineError::Device("no output".into()));
        }
        state.notifiers.push(on_stop);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDevice {
            state: self.state.clone(),
            live: self.live.clone(),
        }))
    }
}

/// Constant-level stream of a fixed length.
pub struct MockStream {
    channels: u16,
    total_samples: u64,
    read: u64,
}

impl MockStream {
    pub fn new(len: Duration) -> Self {
        Self::with_channels(len, CHANNELS)
    }

    pub fn with_channels(len: Duration, channels: u16) -> Self {
        let frames = (len.as_secs_f64() * f64::from(RATE)) as u64;
        Self {
            channels,
            total_samples: frames * u64::from(channels),
            read: 0,
        }
    }
}

impl DecodeStream for MockStream {
    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        RATE
    }

    fn read(&mut self, buf: &mut [f32]) -> usize {
        let left = (self.total_samples - self.read) as usize;
        let n = left.min(buf.len());
        buf[..n].fill(0.5);
        self.read += n as u64;
        n
    }

    fn position(&self) -> Duration {
        let frames = self.read / u64::from(self.channels);
        Duration::from_secs_f64(frames as f64 / f64::from(RATE))
    }

    fn total(&self) -> Duration {
        let frames = self.total_samples / u64::from(self.channels);
        Duration::from_secs_f64(frames as f64 / f64::from(RATE))
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        let frames = (pos.as_secs_f64() * f64::from(RATE)) as u64;
        self.read = (frames * u64::from(self.channels)).min(self.total_samples);
        Ok(())
    }
}

struct MockDevice {
    state: Arc<Mutex<MockState>>,
    live: Arc<AtomicUsize>,
}

impl MockDevice {
    fn log(&self, call: &'static str) {
        self.state.lock().unwrap().device_calls.push(call);
    }
}

impl OutputDevice for MockDevice {
    fn play(&mut self) {
        self.log("play");
    }

    fn pause(&mut self) {
        self.log("pause");
    }

    fn stop(&mut self) {
        self.log("stop");
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
