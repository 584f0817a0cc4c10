//! `rodio` implementation of the backend contracts.
//!
//! Decoding goes through `rodio::Decoder`; each session gets its own `Sink`
//! on the shared default output stream, fed by a source that pulls from the
//! session pipeline and reports end of stream through the stop notifier.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::{EngineError, Result};
use crate::track::TrackRef;

use super::backend::{AudioBackend, DecodeStream, OutputDevice, SharedPipeline, StopNotifier};

/// Samples pulled from the pipeline per lock.
const CHUNK: usize = 2048;

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the system's default output device.
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Device(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self, track: &TrackRef) -> Result<Box<dyn DecodeStream>> {
        Ok(Box::new(RodioStream::open(track)?))
    }

    fn create_device(
        &mut self,
        pipeline: SharedPipeline,
        on_stop: StopNotifier,
    ) -> Result<Box<dyn OutputDevice>> {
        let source = PipelineSource::new(pipeline, on_stop);
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(Box::new(RodioDevice { sink }))
    }
}

struct RodioStream {
    decoder: Decoder<BufReader<File>>,
    channels: u16,
    sample_rate: u32,
    total: Duration,
    samples_read: u64,
}

impl RodioStream {
    fn open(track: &TrackRef) -> Result<Self> {
        let path = track.path();
        let file = File::open(path).map_err(|e| EngineError::open(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| EngineError::open(path, e))?
            .len();

        let mut builder = Decoder::builder()
            .with_data(BufReader::new(file))
            .with_byte_len(len)
            .with_seekable(true);
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            builder = builder.with_hint(ext);
        }
        let decoder = builder.build().map_err(|e| EngineError::open(path, e))?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        if channels == 0 || sample_rate == 0 {
            return Err(EngineError::open(path, "stream reports no audio format"));
        }

        Ok(Self {
            total: decoder.total_duration().unwrap_or(Duration::ZERO),
            decoder,
            channels,
            sample_rate,
            samples_read: 0,
        })
    }

    fn samples_per_second(&self) -> f64 {
        f64::from(self.sample_rate) * f64::from(self.channels)
    }
}

impl DecodeStream for RodioStream {
    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read(&mut self, buf: &mut [f32]) -> usize {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.decoder.next() {
                Some(sample) => {
                    *slot = sample;
                    n += 1;
                }
                None => break,
            }
        }
        self.samples_read += n as u64;
        n
    }

    fn position(&self) -> Duration {
        Duration::from_secs_f64(self.samples_read as f64 / self.samples_per_second())
    }

    fn total(&self) -> Duration {
        self.total
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        self.decoder
            .try_seek(pos)
            .map_err(|e| EngineError::Seek(e.to_string()))?;
        let frames = (pos.as_secs_f64() * f64::from(self.sample_rate)) as u64;
        self.samples_read = frames * u64::from(self.channels);
        Ok(())
    }
}

struct RodioDevice {
    sink: Sink,
}

impl OutputDevice for RodioDevice {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

/// Adapts a session pipeline to `rodio::Source`.
struct PipelineSource {
    pipeline: SharedPipeline,
    notifier: Option<StopNotifier>,
    buf: Vec<f32>,
    pos: usize,
    len: usize,
    channels: u16,
    sample_rate: u32,
}

impl PipelineSource {
    fn new(pipeline: SharedPipeline, notifier: StopNotifier) -> Self {
        let (channels, sample_rate) = match pipeline.lock() {
            Ok(p) => (p.channels(), p.sample_rate()),
            Err(e) => {
                let p = e.into_inner();
                (p.channels(), p.sample_rate())
            }
        };
        let channels_len = usize::from(channels.max(1));

        Self {
            pipeline,
            notifier: Some(notifier),
            buf: vec![0.0; CHUNK - CHUNK % channels_len],
            pos: 0,
            len: 0,
            channels,
            sample_rate,
        }
    }

    fn refill(&mut self) -> bool {
        let read = match self.pipeline.lock() {
            Ok(mut p) => Some(p.read(&mut self.buf)),
            Err(_) => None,
        };
        let Some(read) = read else {
            self.finish(Some("audio pipeline poisoned".to_string()));
            return false;
        };
        self.pos = 0;
        self.len = read;
        if read == 0 {
            self.finish(None);
            return false;
        }
        true
    }

    fn finish(&mut self, error: Option<String>) {
        if let Some(n) = self.notifier.take() {
            n.notify(error);
        }
    }
}

impl Iterator for PipelineSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.len && !self.refill() {
            return None;
        }
        let sample = self.buf[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

impl Source for PipelineSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
