use std::collections::BTreeMap;

use crate::audio::EqBands;
use crate::error::PersistenceError;
use crate::persist::Preferences;

/// Preferences key the custom preset table is stored under.
pub const CUSTOM_PRESETS_KEY: &str = "custom_eq_presets";

/// Persistence port for user-defined presets.
pub trait PresetStore {
    fn load(&self) -> Result<BTreeMap<String, EqBands>, PersistenceError>;
    fn save(&mut self, presets: &BTreeMap<String, EqBands>) -> Result<(), PersistenceError>;
}

impl PresetStore for Preferences {
    fn load(&self) -> Result<BTreeMap<String, EqBands>, PersistenceError> {
        Ok(self.get(CUSTOM_PRESETS_KEY)?.unwrap_or_default())
    }

    fn save(&mut self, presets: &BTreeMap<String, EqBands>) -> Result<(), PersistenceError> {
        self.set(CUSTOM_PRESETS_KEY, presets)
    }
}
