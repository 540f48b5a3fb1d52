use std::collections::BTreeMap;

use crate::audio::{EQ_BAND_COUNT, Engine, EqBands};
use crate::error::{EngineError, PersistenceError};

use super::presets::builtin_preset;
use super::store::PresetStore;

pub const BASS_BOOST_RANGE: (f32, f32) = (0.0, 10.0);
pub const TREBLE_RANGE: (f32, f32) = (0.0, 10.0);
pub const REVERB_RANGE: (f32, f32) = (0.0, 1.0);
pub const BALANCE_RANGE: (f32, f32) = (-1.0, 1.0);

/// Current equalizer and effect values plus the custom preset table.
pub struct EffectsState {
    bands: EqBands,
    bass_boost: f32,
    treble: f32,
    reverb: f32,
    balance: f32,
    custom_presets: BTreeMap<String, EqBands>,
    store: Box<dyn PresetStore>,
}

impl EffectsState {
    /// Start from neutral values and load the saved custom presets.
    ///
    /// An unreadable preset table is logged and treated as empty.
    pub fn new(store: Box<dyn PresetStore>) -> Self {
        let custom_presets = store.load().unwrap_or_else(|e| {
            log::warn!("failed to load custom presets: {e}");
            BTreeMap::new()
        });
        Self {
            bands: [0.0; EQ_BAND_COUNT],
            bass_boost: 0.0,
            treble: 0.0,
            reverb: 0.0,
            balance: 0.0,
            custom_presets,
            store,
        }
    }

    /// Pair this state with `engine` to make changes.
    pub fn control<'a, E: Engine + ?Sized>(&'a mut self, engine: &'a mut E) -> Effects<'a, E> {
        Effects {
            state: self,
            engine,
        }
    }

    /// Adopt the engine's current values without pushing anything back.
    pub fn sync_from<E: Engine + ?Sized>(&mut self, engine: &E) {
        for (i, band) in self.bands.iter_mut().enumerate() {
            *band = engine.eq_band(i);
        }
        self.bass_boost = engine.bass();
        self.treble = engine.treble();
        self.reverb = engine.reverb_room_size();
        self.balance = engine.balance();
    }

    pub fn bands(&self) -> &EqBands {
        &self.bands
    }

    pub fn bass_boost(&self) -> f32 {
        self.bass_boost
    }

    pub fn treble(&self) -> f32 {
        self.treble
    }

    pub fn reverb(&self) -> f32 {
        self.reverb
    }

    pub fn balance(&self) -> f32 {
        self.balance
    }

    pub fn custom_presets(&self) -> &BTreeMap<String, EqBands> {
        &self.custom_presets
    }

    /// Store the current bands under `name`, replacing any preset with that name.
    pub fn save_custom_preset(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.custom_presets.insert(name.to_string(), self.bands);
        log::info!("saved custom preset '{name}'");
        self.store.save(&self.custom_presets)
    }

    /// Remove `name`. Returns `Ok(false)` when there was no such preset.
    pub fn delete_custom_preset(&mut self, name: &str) -> Result<bool, PersistenceError> {
        if self.custom_presets.remove(name).is_none() {
            return Ok(false);
        }
        log::info!("deleted custom preset '{name}'");
        self.store.save(&self.custom_presets)?;
        Ok(true)
    }
}

/// An [`EffectsState`] bound to the engine it drives.
///
/// Setters push to the engine immediately and only update the state once the
/// engine accepted the value.
pub struct Effects<'a, E: Engine + ?Sized> {
    state: &'a mut EffectsState,
    engine: &'a mut E,
}

impl<E: Engine + ?Sized> Effects<'_, E> {
    /// Set one band. Out-of-range indices are ignored; non-finite gains are
    /// rejected.
    pub fn set_eq_band(&mut self, index: usize, gain_db: f32) -> Result<(), EngineError> {
        if index >= EQ_BAND_COUNT {
            return Ok(());
        }
        let mut bands = self.state.bands;
        bands[index] = gain_db;
        self.push_bands(bands)
    }

    /// Copy up to seven values positionally; remaining bands keep their value.
    pub fn set_eq_bands(&mut self, values: &[f32]) -> Result<(), EngineError> {
        let mut bands = self.state.bands;
        for (band, value) in bands.iter_mut().zip(values) {
            *band = *value;
        }
        self.push_bands(bands)
    }

    /// Apply a built-in preset. `Ok(false)` if the name is unknown.
    pub fn apply_preset(&mut self, name: &str) -> Result<bool, EngineError> {
        match builtin_preset(name) {
            Some(bands) => self.push_bands(bands).map(|()| true),
            None => Ok(false),
        }
    }

    /// Apply a saved custom preset. `Ok(false)` if the name is unknown.
    pub fn apply_custom_preset(&mut self, name: &str) -> Result<bool, EngineError> {
        match self.state.custom_presets.get(name).copied() {
            Some(bands) => self.push_bands(bands).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn reset_eq(&mut self) -> Result<(), EngineError> {
        self.push_bands([0.0; EQ_BAND_COUNT])
    }

    pub fn set_bass_boost(&mut self, value: f32) -> Result<(), EngineError> {
        let value = clamp(value, BASS_BOOST_RANGE);
        self.engine.set_bass(value)?;
        self.state.bass_boost = value;
        Ok(())
    }

    pub fn set_treble(&mut self, value: f32) -> Result<(), EngineError> {
        let value = clamp(value, TREBLE_RANGE);
        self.engine.set_treble(value)?;
        self.state.treble = value;
        Ok(())
    }

    pub fn set_reverb(&mut self, value: f32) -> Result<(), EngineError> {
        let value = clamp(value, REVERB_RANGE);
        self.engine.set_reverb_room_size(value)?;
        self.state.reverb = value;
        Ok(())
    }

    pub fn set_balance(&mut self, value: f32) -> Result<(), EngineError> {
        let value = clamp(value, BALANCE_RANGE);
        self.engine.set_balance(value)?;
        self.state.balance = value;
        Ok(())
    }

    /// Zero the equalizer and every effect. Each push is attempted even if an
    /// earlier one failed; the first failure is returned.
    pub fn reset_all(&mut self) -> Result<(), EngineError> {
        let results = [
            self.reset_eq(),
            self.set_bass_boost(0.0),
            self.set_treble(0.0),
            self.set_reverb(0.0),
            self.set_balance(0.0),
        ];
        results.into_iter().collect()
    }

    pub fn save_custom_preset(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.state.save_custom_preset(name)
    }

    pub fn delete_custom_preset(&mut self, name: &str) -> Result<bool, PersistenceError> {
        self.state.delete_custom_preset(name)
    }

    fn push_bands(&mut self, bands: EqBands) -> Result<(), EngineError> {
        // Non-finite gains would serialize as null and poison the preset table.
        if let Some(bad) = bands.iter().find(|g| !g.is_finite()) {
            return Err(EngineError::Rejected {
                parameter: "eq band",
                reason: format!("gain must be finite, got {bad}"),
            });
        }
        self.engine.set_eq_bands(&bands)?;
        self.state.bands = bands;
        Ok(())
    }
}

fn clamp(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}
