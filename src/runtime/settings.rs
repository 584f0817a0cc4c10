use tracing::warn;

use crate::config::Settings;

/// Read the configuration. Errors are returned as text so they can be
/// reported once logging is up.
pub fn load() -> Result<Settings, String> {
    let settings = Settings::load().map_err(|e| format!("failed to load config: {e}"))?;
    settings
        .validate()
        .map_err(|e| format!("invalid config: {e}"))?;
    Ok(settings)
}

/// Config is optional; failures should not prevent the player from starting.
pub fn or_defaults(loaded: Result<Settings, String>) -> Settings {
    loaded.unwrap_or_else(|msg| {
        warn!("{msg}, using defaults");
        Settings::default()
    })
}
