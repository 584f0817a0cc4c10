//! The playback state machine.
//!
//! `Engine` is owned by exactly one thread and mutated only through `&mut
//! self`, so a `play` and its teardown can never overlap. Device stops and
//! position ticks reach it as `Command`s posted to that thread's queue.

use std::sync::mpsc::Sender;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{EqualizerSettings, Settings};
use crate::dsp::Equalizer;
use crate::error::Result;
use crate::mode::{PlayMode, PlayModeStrategy};
use crate::playlist::Playlist;
use crate::queue::QueueManager;
use crate::track::TrackRef;

use super::backend::{
    AudioBackend, OutputDevice, Pipeline, SharedPipeline, StopNotifier, lock_pipeline,
};
use super::disposer::{Disposer, Retired};
use super::events::EventHub;
use super::types::{Command, PlaybackHandle, PlaybackState, PlayerEvent, Reply, SessionId};

/// Engine parameters taken from the settings.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub equalizer: EqualizerSettings,
    pub mode: PlayMode,
    pub shuffle_seed: Option<u64>,
}

impl From<&Settings> for EngineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            equalizer: settings.equalizer.clone(),
            mode: settings.playback.mode,
            shuffle_seed: settings.playback.shuffle_seed,
        }
    }
}

struct Session {
    id: SessionId,
    track: TrackRef,
    pipeline: SharedPipeline,
    device: Box<dyn OutputDevice>,
    paused: bool,
}

pub struct Engine<B: AudioBackend> {
    backend: B,
    queue: QueueManager,
    mode: PlayMode,
    strategy: Box<dyn PlayModeStrategy>,
    rng: StdRng,
    equalizer: EqualizerSettings,

    // A stop notification only counts when it carries this session's id;
    // anything raised by a torn-down device, including after `stop`, is
    // dropped.
    session: Option<Session>,
    next_session: u64,

    inbox: Sender<Command>,
    events: EventHub,
    playback: PlaybackHandle,
    disposer: Disposer,
}

impl<B: AudioBackend> Engine<B> {
    /// `inbox` is the sending side of the queue this engine is driven from;
    /// device notifiers post into it.
    pub fn new(
        backend: B,
        inbox: Sender<Command>,
        events: EventHub,
        playback: PlaybackHandle,
        options: EngineOptions,
    ) -> Self {
        let mut rng = match options.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let strategy = options.mode.strategy(fork(&mut rng));

        let engine = Self {
            backend,
            queue: QueueManager::new(),
            mode: options.mode,
            strategy,
            rng,
            equalizer: options.equalizer,
            session: None,
            next_session: 0,
            inbox,
            events,
            playback,
            disposer: Disposer::spawn(),
        };
        engine.publish();
        engine
    }

    pub fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Play { track, reply } => {
                let result = self.play(track);
                respond(reply, result);
            }
            Command::TogglePause => self.toggle_pause(),
            Command::Stop => self.stop(),
            Command::Seek(pos) => {
                if let Err(e) = self.seek(pos) {
                    warn!(error = %e, "seek failed");
                }
            }
            Command::SetQueue {
                tracks,
                start,
                reply,
            } => {
                let result = self.set_queue(tracks, start);
                respond(reply, result);
            }
            Command::LoadPlaylist {
                playlist,
                start,
                reply,
            } => {
                let result = self.load_playlist(&playlist, start);
                respond(reply, result);
            }
            Command::AddToQueue(track) => self.add_to_queue(track),
            Command::PlayAtIndex { index, reply } => {
                let result = self.play_at_index(index);
                respond(reply, result);
            }
            Command::SetPlayMode(mode) => self.set_play_mode(mode),
            Command::Next { reply } => {
                let result = self.next_track();
                respond(reply, result);
            }
            Command::Previous { reply } => {
                let result = self.previous_track();
                respond(reply, result);
            }
            Command::DeviceStopped { session, error } => self.on_device_stopped(session, error),
            Command::Tick => self.on_tick(),
            Command::Quit => self.shutdown(),
        }
    }

    /// Replace any running session with a new one for `track`.
    ///
    /// On failure the engine is left idle and the error is returned; nothing
    /// is retried.
    pub fn play(&mut self, track: TrackRef) -> Result<()> {
        let had_session = self.teardown();

        match self.start_session(track.clone()) {
            Ok(session) => {
                info!(track = %track, session = session.id.0, "playing");
                self.session = Some(session);
                self.publish();
                self.events.emit(PlayerEvent::PlayStateChanged(true));
                self.events.emit(PlayerEvent::TrackChanged(track));
                Ok(())
            }
            Err(e) => {
                warn!(track = %track, error = %e, "cannot start playback");
                self.publish();
                if had_session {
                    self.emit_stopped(Duration::ZERO, Duration::ZERO);
                }
                Err(e)
            }
        }
    }

    fn start_session(&mut self, track: TrackRef) -> Result<Session> {
        let stream = self.backend.open(&track)?;
        let equalizer =
            Equalizer::from_settings(&self.equalizer, stream.channels(), stream.sample_rate());
        debug!(
            channels = stream.channels(),
            sample_rate = stream.sample_rate(),
            "decode stream opened"
        );
        let pipeline = Pipeline::new(stream, equalizer).shared();

        let id = SessionId(self.next_session);
        self.next_session += 1;

        let notifier = StopNotifier::new(self.inbox.clone(), id);
        let mut device = self.backend.create_device(pipeline.clone(), notifier)?;
        device.play();

        Ok(Session {
            id,
            track,
            pipeline,
            device,
            paused: false,
        })
    }

    /// Halt the current device and hand its resources to the disposer.
    /// Returns whether there was a session.
    fn teardown(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.device.stop();
        debug!(session = session.id.0, track = %session.track, "session torn down");
        self.disposer.retire(Retired {
            session: session.id,
            device: session.device,
            pipeline: session.pipeline,
        });
        true
    }

    pub fn toggle_pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.paused {
            session.device.play();
        } else {
            session.device.pause();
        }
        session.paused = !session.paused;
        let playing = !session.paused;

        self.publish();
        self.events.emit(PlayerEvent::PlayStateChanged(playing));
    }

    pub fn stop(&mut self) {
        self.teardown();
        self.publish();
        self.emit_stopped(Duration::ZERO, Duration::ZERO);
    }

    /// Reposition the current track. Positions past the end are clamped to
    /// the total length when it is known.
    pub fn seek(&mut self, pos: Duration) -> Result<()> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        {
            let mut pipeline = lock_pipeline(&session.pipeline);
            let total = pipeline.total();
            let target = if total > Duration::ZERO {
                pos.min(total)
            } else {
                pos
            };
            pipeline.seek(target)?;
        }
        self.publish();
        Ok(())
    }

    /// Replace the queue and start playing its current track.
    pub fn set_queue(&mut self, tracks: Vec<TrackRef>, start: usize) -> Result<()> {
        self.queue.set_queue(tracks, start);
        self.publish();
        match self.queue.current() {
            Some(track) => self.play(track),
            None => Ok(()),
        }
    }

    /// Queue a playlist and play its `start` entry. Empty playlists are
    /// ignored. The play mode is re-primed so a shuffle covers the new list.
    pub fn load_playlist(&mut self, playlist: &Playlist, start: usize) -> Result<()> {
        if playlist.is_empty() {
            debug!(playlist = playlist.name(), "not loading an empty playlist");
            return Ok(());
        }
        info!(playlist = playlist.name(), tracks = playlist.len(), "loading playlist");
        self.queue.set_queue(playlist.tracks().iter().cloned(), start);
        self.strategy.prime(&self.queue);
        self.publish();
        match self.queue.current() {
            Some(track) => self.play(track),
            None => Ok(()),
        }
    }

    pub fn add_to_queue(&mut self, track: TrackRef) {
        self.queue.add_to_queue(track);
        self.publish();
    }

    /// Out-of-range indices are ignored.
    pub fn play_at_index(&mut self, index: usize) -> Result<()> {
        if index >= self.queue.len() {
            debug!(index, len = self.queue.len(), "play_at_index out of range");
            return Ok(());
        }
        self.queue.set_current_index(index);
        match self.queue.current() {
            Some(track) => self.play(track),
            None => Ok(()),
        }
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) {
        let rng = fork(&mut self.rng);
        self.mode = mode;
        self.strategy = mode.strategy(rng);
        self.strategy.prime(&self.queue);
        info!(mode = %mode, "play mode changed");
        self.publish();
    }

    pub fn next_track(&mut self) -> Result<()> {
        match self.strategy.next_track(&mut self.queue) {
            Some(track) => self.play(track),
            None => {
                if self.mode == PlayMode::StopAfterCurrent {
                    self.stop();
                }
                Ok(())
            }
        }
    }

    pub fn previous_track(&mut self) -> Result<()> {
        match self.strategy.previous_track(&mut self.queue) {
            Some(track) => self.play(track),
            None => Ok(()),
        }
    }

    fn on_device_stopped(&mut self, id: SessionId, error: Option<String>) {
        let current = self.session.as_ref().map(|s| s.id);
        if current != Some(id) {
            debug!(session = id.0, "ignoring stop from a retired session");
            return;
        }

        let (_, total) = self.position();
        self.teardown();
        self.publish();
        self.emit_stopped(total, total);

        if let Some(error) = error {
            warn!(error = %error, "output device failed");
            self.events
                .emit(PlayerEvent::PlaybackStopped { error: Some(error) });
            return;
        }

        self.events.emit(PlayerEvent::PlaybackStopped { error: None });
        self.advance();
    }

    /// Natural end of track: let the strategy pick what comes next.
    fn advance(&mut self) {
        match self.strategy.next_track(&mut self.queue) {
            Some(track) => {
                if let Err(e) = self.play(track) {
                    self.events.emit(PlayerEvent::PlaybackStopped {
                        error: Some(e.to_string()),
                    });
                }
            }
            None if self.mode == PlayMode::StopAfterCurrent => self.stop(),
            None => {
                debug!("nothing left to play");
                self.publish();
            }
        }
    }

    fn on_tick(&mut self) {
        let playing = self.session.as_ref().is_some_and(|s| !s.paused);
        if !playing {
            return;
        }
        let (current, total) = self.position();
        if let Ok(mut info) = self.playback.lock() {
            info.position = current;
            info.total = total;
        }
        self.events
            .emit(PlayerEvent::PositionChanged { current, total });
    }

    /// Stop playback ahead of the owner thread exiting.
    pub fn shutdown(&mut self) {
        if self.session.is_some() {
            self.stop();
        }
    }

    pub fn position(&self) -> (Duration, Duration) {
        match &self.session {
            Some(session) => {
                let pipeline = lock_pipeline(&session.pipeline);
                (pipeline.position(), pipeline.total())
            }
            None => (Duration::ZERO, Duration::ZERO),
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.session {
            None => PlaybackState::Idle,
            Some(s) if s.paused => PlaybackState::Paused,
            Some(_) => PlaybackState::Playing,
        }
    }

    pub fn current_track(&self) -> Option<&TrackRef> {
        self.session.as_ref().map(|s| &s.track)
    }

    pub fn queue(&self) -> &QueueManager {
        &self.queue
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    fn emit_stopped(&self, current: Duration, total: Duration) {
        self.events.emit(PlayerEvent::PlayStateChanged(false));
        self.events
            .emit(PlayerEvent::PositionChanged { current, total });
    }

    /// Refresh the shared snapshot.
    fn publish(&self) {
        let (position, total) = self.position();
        if let Ok(mut info) = self.playback.lock() {
            info.state = self.state();
            info.track = self.current_track().cloned();
            info.position = position;
            info.total = total;
            info.mode = self.mode;
            info.queue_len = self.queue.len();
            info.queue_index = self.queue.current_index();
        }
    }
}

fn fork(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.next_u64())
}

fn respond(reply: Reply, result: Result<()>) {
    // The caller may have stopped waiting.
    let _ = reply.send(result);
}
