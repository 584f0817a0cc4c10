//! Command-line front end: settings, logging, scanning and the stdin loop.

use std::env;
use std::io;
use std::time::Duration;

use tracing::{info, warn};

use crate::audio::{EngineOptions, Player, RodioBackend};
use crate::library;
use crate::playlist::PlaylistManager;

mod commands;
mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = startup::parse_args(env::args().skip(1));

    let loaded = settings::load();
    let filter = loaded
        .as_ref()
        .map(|s| s.logging.filter.clone())
        .unwrap_or_else(|_| "info".to_string());
    logging::init(&filter);
    let settings = settings::or_defaults(loaded);

    if args.dump_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let paths = if args.paths.is_empty() {
        vec![env::current_dir()?]
    } else {
        args.paths
    };
    let tracks = library::collect(&paths, &settings.library);
    info!(count = tracks.len(), "library loaded");

    let tick = Duration::from_millis(settings.playback.position_interval_ms.max(1));
    let player = Player::spawn(
        RodioBackend::open_default,
        EngineOptions::from(&settings),
        tick,
    )?;

    let (_, events) = player.subscribe_all();
    let printer = event_loop::spawn_printer(events);

    if let Err(e) = startup::apply_playback_defaults(&player, &settings, &tracks) {
        warn!(error = %e, "could not start playback");
    }

    let mut shell = event_loop::Shell {
        player: &player,
        library: &settings.library,
        queue: tracks,
        playlists: PlaylistManager::new(),
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let result = event_loop::run(&mut shell, stdin.lock(), &mut stdout);
    drop(shell);

    player.shutdown();
    drop(player);
    if let Some(handle) = printer {
        let _ = handle.join();
    }

    Ok(result?)
}
