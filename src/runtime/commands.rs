use std::path::PathBuf;
use std::time::Duration;

use crate::mode::PlayMode;

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Resume, or jump to a 1-based queue position.
    Play(Option<usize>),
    Pause,
    Stop,
    Next,
    Prev,
    Seek(Duration),
    /// Relative seek in seconds.
    SeekBy(f64),
    /// Switch to the named mode, or cycle when none is given.
    Mode(Option<PlayMode>),
    Add(PathBuf),
    Playlist(PlaylistCommand),
    List,
    Status,
    Help,
    Quit,
}

/// `pl ...` verbs. Positions are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistCommand {
    Create(String),
    Delete(String),
    /// Add queue entry N, or the playing track when none is given.
    Add { name: String, entry: Option<usize> },
    /// Drop entry N of the playlist.
    Remove { name: String, entry: usize },
    Load { name: String, start: Option<usize> },
    /// List playlists, or the tracks of one.
    Show(Option<String>),
}

pub const HELP: &str = "\
commands:
  play [N]    resume, or play queue entry N
  pause       toggle pause
  stop        stop playback
  next, prev  skip according to the play mode
  seek S      jump to S seconds
  +S, -S      seek relative to the current position
  mode [NAME] set or cycle the play mode
  add PATH    queue a file or directory
  pl new|del NAME       create or delete a playlist
  pl add NAME [N]       add queue entry N (default: playing track)
  pl rm NAME N          remove playlist entry N
  pl load NAME [N]      queue a playlist, starting at entry N
  pl show [NAME]        list playlists or one playlist's tracks
  list        show the queue
  status      show what is playing
  quit        exit";

fn seconds(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("not a number of seconds: {raw:?}"))?;
    // Anything a `Duration` cannot hold is rejected here rather than later.
    Duration::try_from_secs_f64(value.abs())
        .map_err(|_| format!("not a usable number of seconds: {raw:?}"))?;
    Ok(value)
}

fn position(raw: &str) -> Result<usize, String> {
    let n: usize = raw
        .parse()
        .map_err(|_| format!("not a position: {raw:?}"))?;
    if n == 0 {
        return Err("positions start at 1".to_string());
    }
    Ok(n)
}

fn parse_playlist(rest: Option<&str>) -> Result<PlaylistCommand, String> {
    let words: Vec<&str> = rest.unwrap_or("").split_whitespace().collect();

    let cmd = match words.as_slice() {
        ["new", n] => PlaylistCommand::Create(n.to_string()),
        ["del", n] => PlaylistCommand::Delete(n.to_string()),
        ["add", n] => PlaylistCommand::Add {
            name: n.to_string(),
            entry: None,
        },
        ["add", n, i] => PlaylistCommand::Add {
            name: n.to_string(),
            entry: Some(position(i)?),
        },
        ["rm", n, i] => PlaylistCommand::Remove {
            name: n.to_string(),
            entry: position(i)?,
        },
        ["load", n] => PlaylistCommand::Load {
            name: n.to_string(),
            start: None,
        },
        ["load", n, i] => PlaylistCommand::Load {
            name: n.to_string(),
            start: Some(position(i)?),
        },
        ["show"] => PlaylistCommand::Show(None),
        ["show", n] => PlaylistCommand::Show(Some(n.to_string())),
        _ => return Err("usage: pl new|del|add|rm|load|show ... (try `help`)".to_string()),
    };
    Ok(cmd)
}

/// Parse a line. `Ok(None)` means the line was blank.
pub fn parse(line: &str) -> Result<Option<UserCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix('+') {
        return seconds(rest.trim()).map(|s| Some(UserCommand::SeekBy(s.abs())));
    }
    if let Some(rest) = line.strip_prefix('-') {
        return seconds(rest.trim()).map(|s| Some(UserCommand::SeekBy(-s.abs())));
    }

    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((w, a)) => (w, Some(a.trim())),
        None => (line, None),
    };

    let cmd = match (word.to_ascii_lowercase().as_str(), arg) {
        ("play" | "p", None) => UserCommand::Play(None),
        ("play" | "p", Some(n)) => UserCommand::Play(Some(position(n)?)),
        ("pause" | "toggle", None) => UserCommand::Pause,
        ("stop", None) => UserCommand::Stop,
        ("next" | "n", None) => UserCommand::Next,
        ("prev" | "previous", None) => UserCommand::Prev,
        ("seek", Some(s)) => {
            let s = seconds(s)?;
            if s < 0.0 {
                return Err("seek position must not be negative".to_string());
            }
            let pos = Duration::try_from_secs_f64(s)
                .map_err(|_| format!("not a usable number of seconds: {s}"))?;
            UserCommand::Seek(pos)
        }
        ("mode", None) => UserCommand::Mode(None),
        ("mode", Some(name)) => UserCommand::Mode(Some(name.parse::<PlayMode>()?)),
        ("add", Some(path)) => UserCommand::Add(PathBuf::from(path)),
        ("pl" | "playlist", rest) => UserCommand::Playlist(parse_playlist(rest)?),
        ("list" | "ls", None) => UserCommand::List,
        ("status", None) => UserCommand::Status,
        ("help" | "?", None) => UserCommand::Help,
        ("quit" | "q" | "exit", None) => UserCommand::Quit,
        (w, _) => return Err(format!("unknown command or arguments: {w:?} (try `help`)")),
    };
    Ok(Some(cmd))
}
