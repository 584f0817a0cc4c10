use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::mode::PlayMode;
use crate::playlist::Playlist;
use crate::track::TrackRef;

use super::backend::AudioBackend;
use super::engine::{Engine, EngineOptions};
use super::events::{EventHub, SubscriptionId};
use super::ticker::Ticker;
use super::types::{Command, EventKind, PlaybackHandle, PlaybackInfo, PlayerEvent, Reply};

/// Caller-facing handle to an engine running on its own owner thread.
///
/// Every method enqueues a command; those that may start playback wait for
/// the owner's answer so that open failures reach the caller.
pub struct Player {
    tx: Sender<Command>,
    events: EventHub,
    playback: PlaybackHandle,
    ticker: Mutex<Option<Ticker>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start the owner thread. The backend is built on that thread, since
    /// output streams are commonly not `Send`.
    pub fn spawn<B, F>(make_backend: F, options: EngineOptions, tick: Duration) -> Result<Self>
    where
        B: AudioBackend + 'static,
        F: FnOnce() -> Result<B> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Command>();
        let events = EventHub::new();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        let inbox = tx.clone();
        let engine_events = events.clone();
        let engine_playback = playback.clone();

        let join = thread::Builder::new()
            .name("cadence-engine".into())
            .spawn(move || {
                let backend = match make_backend() {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let mut engine = Engine::new(backend, inbox, engine_events, engine_playback, options);
                let _ = ready_tx.send(Ok(()));
                run_owner_loop(&mut engine, rx);
            })
            .map_err(|e| EngineError::Device(format!("cannot start engine thread: {e}")))?;

        let started = ready_rx.recv().unwrap_or(Err(EngineError::Disconnected));
        if let Err(e) = started {
            let _ = join.join();
            return Err(e);
        }

        let ticker = Ticker::spawn(tick, tx.clone());

        Ok(Self {
            tx,
            events,
            playback,
            ticker: Mutex::new(Some(ticker)),
            join: Mutex::new(Some(join)),
        })
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.tx.send(cmd).map_err(|_| EngineError::Disconnected)
    }

    fn request(&self, build: impl FnOnce(Reply) -> Command) -> Result<()> {
        let (reply, answer) = mpsc::channel();
        self.send(build(reply))?;
        answer.recv().map_err(|_| EngineError::Disconnected)?
    }

    pub fn play(&self, track: TrackRef) -> Result<()> {
        self.request(|reply| Command::Play { track, reply })
    }

    pub fn toggle_pause(&self) -> Result<()> {
        self.send(Command::TogglePause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send(Command::Seek(position))
    }

    pub fn set_queue(&self, tracks: Vec<TrackRef>, start: usize) -> Result<()> {
        self.request(|reply| Command::SetQueue {
            tracks,
            start,
            reply,
        })
    }

    pub fn load_playlist(&self, playlist: &Playlist, start: usize) -> Result<()> {
        let playlist = playlist.clone();
        self.request(|reply| Command::LoadPlaylist {
            playlist,
            start,
            reply,
        })
    }

    pub fn add_to_queue(&self, track: TrackRef) -> Result<()> {
        self.send(Command::AddToQueue(track))
    }

    pub fn play_at_index(&self, index: usize) -> Result<()> {
        self.request(|reply| Command::PlayAtIndex { index, reply })
    }

    pub fn set_play_mode(&self, mode: PlayMode) -> Result<()> {
        self.send(Command::SetPlayMode(mode))
    }

    pub fn next_track(&self) -> Result<()> {
        self.request(|reply| Command::Next { reply })
    }

    pub fn previous_track(&self) -> Result<()> {
        self.request(|reply| Command::Previous { reply })
    }

    pub fn subscribe(&self, kinds: &[EventKind]) -> (SubscriptionId, Receiver<PlayerEvent>) {
        self.events.subscribe(kinds)
    }

    pub fn subscribe_all(&self) -> (SubscriptionId, Receiver<PlayerEvent>) {
        self.events.subscribe_all()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    /// Snapshot of the shared playback info.
    pub fn info(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }

    /// Cancel the ticker, stop playback and wait for the owner thread.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        if let Ok(mut t) = self.ticker.lock() {
            if let Some(mut ticker) = t.take() {
                ticker.cancel();
            }
        }

        let _ = self.send(Command::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_owner_loop<B: AudioBackend>(engine: &mut Engine<B>, rx: Receiver<Command>) {
    for cmd in rx {
        if let Command::Quit = cmd {
            engine.shutdown();
            break;
        }
        engine.handle(cmd);
    }
    debug!("engine owner thread exiting");
}
