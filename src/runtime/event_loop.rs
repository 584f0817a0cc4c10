use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::warn;

use crate::audio::{PlaybackInfo, PlaybackState, Player, PlayerEvent};
use crate::config::LibrarySettings;
use crate::library::{self, LibraryTrack};
use crate::playlist::PlaylistManager;
use crate::track::TrackRef;

use super::commands::{self, HELP, PlaylistCommand, UserCommand};

pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Text for an event worth showing; position updates are left to `status`.
pub fn describe_event(event: &PlayerEvent) -> Option<String> {
    match event {
        PlayerEvent::TrackChanged(track) => Some(format!("now playing: {}", track.name())),
        PlayerEvent::PlayStateChanged(true) => Some("playing".to_string()),
        PlayerEvent::PlayStateChanged(false) => Some("stopped/paused".to_string()),
        PlayerEvent::PlaybackStopped { error: Some(e) } => Some(format!("playback failed: {e}")),
        PlayerEvent::PlaybackStopped { error: None } | PlayerEvent::PositionChanged { .. } => None,
    }
}

/// Print events until the player goes away.
pub fn spawn_printer(events: Receiver<PlayerEvent>) -> Option<JoinHandle<()>> {
    thread::Builder::new()
        .name("cadence-printer".into())
        .spawn(move || {
            for event in events {
                if let Some(line) = describe_event(&event) {
                    println!("{line}");
                }
            }
        })
        .map_err(|e| warn!(error = %e, "cannot start event printer"))
        .ok()
}

pub fn status_line(info: &PlaybackInfo) -> String {
    let state = match info.state {
        PlaybackState::Idle => "idle",
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
    };
    let track = info
        .track
        .as_ref()
        .map(|t| t.name())
        .unwrap_or_else(|| "-".to_string());
    let index = info
        .queue_index
        .map(|i| (i + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{state}] {track} {}/{} | mode {} | {index}/{}",
        format_time(info.position),
        format_time(info.total),
        info.mode,
        info.queue_len,
    )
}

/// Target of a relative seek, saturating at both ends.
pub fn relative_target(position: Duration, delta_secs: f64) -> Duration {
    let target = position.as_secs_f64() + delta_secs;
    if target.is_nan() || target <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(target).unwrap_or(Duration::MAX)
}

/// Front-end state carried between commands. `queue` mirrors the player's
/// queue for listing and for resolving 1-based positions.
pub struct Shell<'a> {
    pub player: &'a Player,
    pub library: &'a LibrarySettings,
    pub queue: Vec<LibraryTrack>,
    pub playlists: PlaylistManager,
}

/// Read commands from `input` until `quit` or end of input.
pub fn run(
    shell: &mut Shell<'_>,
    input: impl BufRead,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(out, "type `help` for commands")?;

    for line in input.lines() {
        let line = line?;
        let cmd = match commands::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };

        if cmd == UserCommand::Quit {
            break;
        }
        if let Err(e) = execute(cmd, shell, out) {
            writeln!(out, "error: {e}")?;
        }
        out.flush()?;
    }
    Ok(())
}

fn execute(
    cmd: UserCommand,
    shell: &mut Shell<'_>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let player = shell.player;
    let info = player.info();
    match cmd {
        UserCommand::Play(Some(n)) => player.play_at_index(n - 1)?,
        UserCommand::Play(None) => match info.state {
            PlaybackState::Paused => player.toggle_pause()?,
            PlaybackState::Playing => {}
            PlaybackState::Idle => player.play_at_index(info.queue_index.unwrap_or(0))?,
        },
        UserCommand::Pause => player.toggle_pause()?,
        UserCommand::Stop => player.stop()?,
        UserCommand::Next => player.next_track()?,
        UserCommand::Prev => player.previous_track()?,
        UserCommand::Seek(pos) => player.seek(pos)?,
        UserCommand::SeekBy(delta) => player.seek(relative_target(info.position, delta))?,
        UserCommand::Mode(mode) => {
            let mode = mode.unwrap_or_else(|| info.mode.cycle());
            player.set_play_mode(mode)?;
            writeln!(out, "mode: {mode}")?;
        }
        UserCommand::Add(path) => add(shell, &path, out)?,
        UserCommand::Playlist(cmd) => playlist(shell, cmd, &info, out)?,
        UserCommand::List => {
            for (i, t) in shell.queue.iter().enumerate() {
                let marker = if info.queue_index == Some(i) { '>' } else { ' ' };
                let len = t.duration.map(format_time).unwrap_or_default();
                writeln!(out, "{marker}{:>4}  {}  {len}", i + 1, t.display)?;
            }
        }
        UserCommand::Status => writeln!(out, "{}", status_line(&info))?,
        UserCommand::Help => writeln!(out, "{HELP}")?,
        UserCommand::Quit => {}
    }
    Ok(())
}

fn add(
    shell: &mut Shell<'_>,
    path: &Path,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let found = library::collect(&[path.to_path_buf()], shell.library);
    let mut added = 0;
    for track in found {
        if shell.queue.iter().any(|t| t.path == track.path) {
            continue;
        }
        shell.player.add_to_queue(track.to_ref())?;
        shell.queue.push(track);
        added += 1;
    }
    writeln!(out, "queued {added} track(s)")?;
    Ok(())
}

fn entry<T: Clone>(items: &[T], n: usize) -> Result<T, String> {
    items
        .get(n - 1)
        .cloned()
        .ok_or_else(|| format!("no entry {n} (have {})", items.len()))
}

fn playlist(
    shell: &mut Shell<'_>,
    cmd: PlaylistCommand,
    info: &PlaybackInfo,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PlaylistCommand::Create(name) => {
            shell.playlists.create_playlist(&name)?;
            writeln!(out, "created playlist {name}")?;
        }
        PlaylistCommand::Delete(name) => {
            if !shell.playlists.delete_playlist(&name) {
                writeln!(out, "no playlist named {name}")?;
            }
        }
        PlaylistCommand::Add { name, entry: n } => {
            let track = match n {
                Some(n) => entry(&shell.queue, n)?.to_ref(),
                None => info.track.clone().ok_or("nothing is playing")?,
            };
            if !shell.playlists.add_track_to_playlist(&name, track)? {
                writeln!(out, "already in {name}")?;
            }
        }
        PlaylistCommand::Remove { name, entry: n } => {
            let listed = shell
                .playlists
                .get(&name)
                .map(|p| p.tracks().to_vec())
                .ok_or_else(|| format!("no playlist named {name}"))?;
            let track = entry(&listed, n)?;
            shell.playlists.remove_track_from_playlist(&name, &track)?;
        }
        PlaylistCommand::Load { name, start } => {
            let Some(list) = shell.playlists.get(&name) else {
                return Err(format!("no playlist named {name}").into());
            };
            if list.is_empty() {
                writeln!(out, "{name} is empty")?;
                return Ok(());
            }
            let start = start.map_or(0, |n| n - 1);
            if start >= list.len() {
                return Err(format!("no entry {} (have {})", start + 1, list.len()).into());
            }
            shell.queue = mirror(&shell.queue, list.tracks());
            shell.player.load_playlist(list, start)?;
        }
        PlaylistCommand::Show(None) => {
            for p in shell.playlists.playlists() {
                writeln!(out, "{}  ({} tracks)", p.name(), p.len())?;
            }
        }
        PlaylistCommand::Show(Some(name)) => {
            let list = shell
                .playlists
                .get(&name)
                .ok_or_else(|| format!("no playlist named {name}"))?;
            for (i, t) in list.tracks().iter().enumerate() {
                writeln!(out, "{:>4}  {}", i + 1, t.name())?;
            }
        }
    }
    Ok(())
}

/// Queue view for `tracks`, reusing known tag data where the path matches.
pub fn mirror(known: &[LibraryTrack], tracks: &[TrackRef]) -> Vec<LibraryTrack> {
    tracks
        .iter()
        .map(|t| {
            known
                .iter()
                .find(|k| k.path == t.path())
                .cloned()
                .unwrap_or_else(|| LibraryTrack::bare(t.path().to_path_buf()))
        })
        .collect()
}
