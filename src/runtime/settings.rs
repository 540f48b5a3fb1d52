use crate::config::{self, Settings};

/// Load and validate settings, falling back to defaults on any problem.
///
/// A broken config file must never make the library unreachable.
pub fn load_settings() -> Settings {
    if let Some(path) = config::resolve_config_path() {
        log::debug!("config path {}", path.display());
    }

    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config: {msg}")),
        });

    loaded.unwrap_or_else(|reason| {
        log::warn!("{reason}; using defaults");
        Settings::default()
    })
}
