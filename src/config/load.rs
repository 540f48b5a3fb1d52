use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `TONEARM__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TONEARM")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.poll_interval_ms == 0 {
            return Err("playback.poll_interval_ms must be >= 1".to_string());
        }
        if self.sleep_timer.tick_ms == 0 {
            return Err("sleep_timer.tick_ms must be >= 1".to_string());
        }
        if self.sleep_timer.fade_window_secs == 0 {
            return Err("sleep_timer.fade_window_secs must be >= 1".to_string());
        }
        if self.library.audio_dir_name.trim().is_empty() {
            return Err("library.audio_dir_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TONEARM_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TONEARM_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tonearm/config.toml`
/// or `~/.config/tonearm/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("tonearm").join("config.toml"))
}

/// Default library root: `$XDG_DATA_HOME/tonearm` or `~/.local/share/tonearm`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("tonearm"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
