use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::effects::EffectsState;
use crate::library::{JsonDocument, LibraryStore, LoftyProbe};
use crate::persist::Preferences;
use crate::session::SleepTimer;

/// Resolved on-disk locations derived from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub audio_dir: PathBuf,
    pub metadata_file: PathBuf,
    pub preferences_file: PathBuf,
}

impl Paths {
    pub fn from_settings(settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let root = settings
            .library
            .resolved_root()
            .ok_or("cannot determine a data directory; set library.root_dir")?;
        Ok(Self {
            audio_dir: root.join(&settings.library.audio_dir_name),
            metadata_file: root.join(&settings.library.metadata_file_name),
            preferences_file: root.join(&settings.effects.preferences_file_name),
        })
    }
}

pub fn open_library(settings: &Settings, paths: &Paths) -> LibraryStore {
    let library = LibraryStore::open(
        &paths.audio_dir,
        settings.library.extensions.clone(),
        Box::new(JsonDocument::new(&paths.metadata_file)),
        Box::new(LoftyProbe),
    );
    if let Some(e) = library.last_error() {
        log::warn!("library opened with error: {e}");
    }
    log::debug!(
        "library at {} holds {} songs",
        paths.audio_dir.display(),
        library.song_count()
    );
    library
}

pub fn open_effects(paths: &Paths) -> EffectsState {
    EffectsState::new(Box::new(Preferences::new(&paths.preferences_file)))
}

pub fn sleep_timer(settings: &Settings) -> SleepTimer {
    SleepTimer::new(
        Duration::from_secs(settings.sleep_timer.fade_window_secs),
        Duration::from_millis(settings.sleep_timer.tick_ms),
    )
}
