use std::path::PathBuf;

use serde::Deserialize;

use crate::audio::RepeatMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tonearm/config.toml` or `~/.config/tonearm/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TONEARM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub sleep_timer: SleepTimerSettings,
    pub effects: EffectsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory holding the managed audio directory and the metadata document.
    /// Falls back to the XDG data directory when unset.
    pub root_dir: Option<PathBuf>,
    /// Name of the flat directory imported files are copied into.
    pub audio_dir_name: String,
    /// Name of the JSON document listing every imported track.
    pub metadata_file_name: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root_dir: None,
            audio_dir_name: "ImportedAudio".to_string(),
            metadata_file_name: "library_metadata.json".to_string(),
            extensions: [
                "mp3", "m4a", "wav", "aiff", "aac", "caf", "flac", "ogg", "wma", "alac",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl LibrarySettings {
    /// The effective root directory (configured or XDG default).
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.root_dir.clone().or_else(super::default_data_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Repeat mode a new session starts with.
    pub repeat_mode: RepeatModeSetting,
    /// How often the playback position is read back from the engine.
    pub poll_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat_mode: RepeatModeSetting::Off,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "none", alias = "no-repeat", alias = "no_repeat")]
    Off,
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    One,
    #[serde(alias = "repeat-all", alias = "repeat_all", alias = "loop-all")]
    All,
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(setting: RepeatModeSetting) -> Self {
        match setting {
            RepeatModeSetting::Off => RepeatMode::Off,
            RepeatModeSetting::One => RepeatMode::One,
            RepeatModeSetting::All => RepeatMode::All,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SleepTimerSettings {
    /// Whether a sleep timer fades the volume out before pausing.
    pub fade_out: bool,
    /// Length of the final volume ramp (seconds).
    pub fade_window_secs: u64,
    /// Countdown tick length (milliseconds).
    pub tick_ms: u64,
}

impl Default for SleepTimerSettings {
    fn default() -> Self {
        Self {
            fade_out: true,
            fade_window_secs: 30,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EffectsSettings {
    /// Key-value preferences file (under the library root) holding custom presets.
    pub preferences_file_name: String,
}

impl Default for EffectsSettings {
    fn default() -> Self {
        Self {
            preferences_file_name: "preferences.json".to_string(),
        }
    }
}
