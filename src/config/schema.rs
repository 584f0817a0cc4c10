use serde::{Deserialize, Serialize};

use crate::mode::PlayMode;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadence/config.toml` or `~/.config/cadence/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENCE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub equalizer: EqualizerSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Play mode active at startup.
    pub mode: PlayMode,
    /// Fixed seed for the shuffle order. Unset means a fresh seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
    /// Interval between position updates (milliseconds).
    pub position_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            mode: PlayMode::Sequential,
            shuffle_seed: None,
            position_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EqualizerSettings {
    pub enabled: bool,
    /// Filter stages applied in order to every channel.
    pub bands: Vec<BandSettings>,
}

impl Default for EqualizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bands: vec![
                BandSettings {
                    kind: BandKind::LowShelf,
                    frequency: 100.0,
                    q: 0.7,
                    gain_db: 3.0,
                },
                BandSettings {
                    kind: BandKind::HighShelf,
                    frequency: 10_000.0,
                    q: 0.7,
                    gain_db: 3.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BandSettings {
    pub kind: BandKind,
    /// Corner (shelves) or centre (peaking) frequency in Hz.
    pub frequency: f32,
    /// Shelf slope for shelves, bandwidth Q for peaking bands.
    pub q: f32,
    pub gain_db: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandKind {
    #[serde(alias = "low_shelf", alias = "lowshelf", alias = "bass")]
    LowShelf,
    #[serde(alias = "high_shelf", alias = "highshelf", alias = "treble")]
    HighShelf,
    #[serde(alias = "peak", alias = "bell")]
    Peaking,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
