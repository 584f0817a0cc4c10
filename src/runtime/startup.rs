use std::path::PathBuf;

use tracing::info;

use crate::audio::Player;
use crate::config::Settings;
use crate::error::Result;
use crate::library::LibraryTrack;

#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub dump_config: bool,
    pub paths: Vec<PathBuf>,
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut out = Args::default();
    for arg in args {
        match arg.as_str() {
            "--dump-config" => out.dump_config = true,
            _ => out.paths.push(PathBuf::from(arg)),
        }
    }
    out
}

/// Hand the scanned tracks and the configured mode to the player.
pub fn apply_playback_defaults(
    player: &Player,
    settings: &Settings,
    tracks: &[LibraryTrack],
) -> Result<()> {
    player.set_play_mode(settings.playback.mode)?;
    if tracks.is_empty() {
        info!("nothing to play; use `add PATH`");
        return Ok(());
    }
    player.set_queue(tracks.iter().map(LibraryTrack::to_ref).collect(), 0)
}
