use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tempfile::tempdir;

use super::*;
use crate::audio::EqBands;
use crate::audio::fake::FakeEngine;
use crate::error::PersistenceError;
use crate::persist::Preferences;

#[derive(Clone, Default)]
struct MemoryPresets {
    table: Rc<RefCell<BTreeMap<String, EqBands>>>,
    saves: Rc<RefCell<usize>>,
}

impl PresetStore for MemoryPresets {
    fn load(&self) -> Result<BTreeMap<String, EqBands>, PersistenceError> {
        Ok(self.table.borrow().clone())
    }

    fn save(&mut self, presets: &BTreeMap<String, EqBands>) -> Result<(), PersistenceError> {
        *self.table.borrow_mut() = presets.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

fn state() -> (EffectsState, MemoryPresets) {
    let store = MemoryPresets::default();
    (EffectsState::new(Box::new(store.clone())), store)
}

#[test]
fn builtin_table_has_twelve_presets_and_flat_is_neutral() {
    assert_eq!(BUILTIN_PRESETS.len(), 12);
    assert_eq!(builtin_preset("Flat"), Some([0.0; 7]));
    assert_eq!(
        builtin_preset("Rock"),
        Some([4.0, 2.0, -1.0, 0.0, 2.0, 4.0, 5.0])
    );
    assert_eq!(builtin_preset("rock"), None);

    let names = builtin_preset_names();
    assert_eq!(names.first(), Some(&"Acoustic"));
    assert_eq!(names.last(), Some(&"Vocal"));
}

#[test]
fn set_eq_band_pushes_whole_vector_and_ignores_bad_index() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();

    state.control(&mut engine).set_eq_band(2, 3.5).unwrap();
    assert_eq!(state.bands()[2], 3.5);
    assert_eq!(engine.bands[2], 3.5);
    assert_eq!(engine.eq_pushes, 1);

    state.control(&mut engine).set_eq_band(7, 9.0).unwrap();
    assert_eq!(engine.eq_pushes, 1);
    assert!(!state.bands().contains(&9.0));
}

#[test]
fn set_eq_bands_copies_positionally() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();
    state.control(&mut engine).set_eq_band(6, 1.0).unwrap();

    state.control(&mut engine).set_eq_bands(&[5.0, 4.0]).unwrap();
    assert_eq!(state.bands(), &[5.0, 4.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

    let long = [1.0; 9];
    state.control(&mut engine).set_eq_bands(&long).unwrap();
    assert_eq!(state.bands(), &[1.0; 7]);
    assert_eq!(engine.bands, [1.0; 7]);
}

#[test]
fn apply_preset_sets_all_bands_and_reports_unknown_names() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();

    assert!(state.control(&mut engine).apply_preset("Vocal").unwrap());
    assert_eq!(engine.bands, [-2.0, 0.0, 2.0, 4.0, 3.0, 1.0, 0.0]);

    assert!(!state.control(&mut engine).apply_preset("Nope").unwrap());
    assert_eq!(state.bands(), &[-2.0, 0.0, 2.0, 4.0, 3.0, 1.0, 0.0]);
}

#[test]
fn scalar_effects_are_clamped() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();
    let mut fx = state.control(&mut engine);

    fx.set_bass_boost(12.0).unwrap();
    fx.set_treble(-3.0).unwrap();
    fx.set_reverb(0.4).unwrap();
    fx.set_balance(-2.0).unwrap();

    assert_eq!(state.bass_boost(), 10.0);
    assert_eq!(state.treble(), 0.0);
    assert_eq!(state.reverb(), 0.4);
    assert_eq!(state.balance(), -1.0);
    assert_eq!(engine.bass, 10.0);
    assert_eq!(engine.balance, -1.0);
}

#[test]
fn rejected_push_leaves_state_unchanged() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();
    engine.reject_effects = true;

    assert!(state.control(&mut engine).set_bass_boost(4.0).is_err());
    assert!(state.control(&mut engine).apply_preset("Rock").is_err());
    assert_eq!(state.bass_boost(), 0.0);
    assert_eq!(state.bands(), &[0.0; 7]);
}

#[test]
fn reset_all_zeroes_everything() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();
    {
        let mut fx = state.control(&mut engine);
        fx.apply_preset("Loudness").unwrap();
        fx.set_bass_boost(3.0).unwrap();
        fx.set_treble(2.0).unwrap();
        fx.set_reverb(0.5).unwrap();
        fx.set_balance(0.25).unwrap();
        fx.reset_all().unwrap();
    }

    assert_eq!(state.bands(), &[0.0; 7]);
    assert_eq!(state.bass_boost(), 0.0);
    assert_eq!(state.treble(), 0.0);
    assert_eq!(state.reverb(), 0.0);
    assert_eq!(state.balance(), 0.0);
    assert_eq!(engine.reverb, 0.0);
}

#[test]
fn reset_all_attempts_every_push_even_after_a_failure() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();
    engine.reject_effects = true;

    let err = state.control(&mut engine).reset_all().unwrap_err();
    assert!(matches!(
        err,
        crate::error::EngineError::Rejected { parameter: "eq", .. }
    ));
}

#[test]
fn custom_presets_save_apply_and_delete() {
    let (mut state, store) = state();
    let mut engine = FakeEngine::new();

    state
        .control(&mut engine)
        .set_eq_bands(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
        .unwrap();
    state.save_custom_preset("Mine").unwrap();
    assert_eq!(*store.saves.borrow(), 1);
    assert!(store.table.borrow().contains_key("Mine"));

    state.control(&mut engine).reset_eq().unwrap();
    assert!(state.control(&mut engine).apply_custom_preset("Mine").unwrap());
    assert_eq!(engine.bands, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    assert!(!state.control(&mut engine).apply_custom_preset("mine").unwrap());

    assert!(state.delete_custom_preset("Mine").unwrap());
    assert!(!state.delete_custom_preset("Mine").unwrap());
    assert_eq!(*store.saves.borrow(), 2);
    assert!(state.custom_presets().is_empty());
}

#[test]
fn saving_existing_name_overwrites() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();

    state.save_custom_preset("Mine").unwrap();
    state.control(&mut engine).set_eq_band(0, 6.0).unwrap();
    state.save_custom_preset("Mine").unwrap();

    assert_eq!(state.custom_presets().len(), 1);
    assert_eq!(state.custom_presets()["Mine"][0], 6.0);
}

#[test]
fn custom_presets_survive_restart_through_preferences() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let mut engine = FakeEngine::new();

    {
        let mut state = EffectsState::new(Box::new(Preferences::new(&path)));
        state.control(&mut engine).apply_preset("Jazz").unwrap();
        state.save_custom_preset("Late Night").unwrap();
    }

    let reopened = EffectsState::new(Box::new(Preferences::new(&path)));
    assert_eq!(
        reopened.custom_presets().get("Late Night"),
        builtin_preset("Jazz").as_ref()
    );
    let raw: BTreeMap<String, EqBands> = Preferences::new(&path)
        .get(CUSTOM_PRESETS_KEY)
        .unwrap()
        .unwrap();
    assert_eq!(raw.len(), 1);
}

#[test]
fn non_finite_gains_are_rejected_and_saved_presets_survive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let mut engine = FakeEngine::new();

    {
        let mut state = EffectsState::new(Box::new(Preferences::new(&path)));
        state.control(&mut engine).apply_preset("Jazz").unwrap();
        state.save_custom_preset("Keep").unwrap();

        let mut fx = state.control(&mut engine);
        assert!(fx.set_eq_band(0, f32::NAN).is_err());
        assert!(fx.set_eq_bands(&[1.0, f32::INFINITY]).is_err());
        assert!(fx.set_eq_band(6, f32::NEG_INFINITY).is_err());
        assert_eq!(Some(*state.bands()), builtin_preset("Jazz"));
        assert_eq!(Some(engine.bands), builtin_preset("Jazz"));

        state.save_custom_preset("Also Jazz").unwrap();
    }

    let mut reopened = EffectsState::new(Box::new(Preferences::new(&path)));
    assert!(reopened.custom_presets().contains_key("Keep"));
    reopened.save_custom_preset("New").unwrap();

    let raw: BTreeMap<String, EqBands> = Preferences::new(&path)
        .get(CUSTOM_PRESETS_KEY)
        .unwrap()
        .unwrap();
    let names: Vec<&str> = raw.keys().map(String::as_str).collect();
    assert_eq!(names, ["Also Jazz", "Keep", "New"]);
}

#[test]
fn unreadable_preset_table_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, b"{ broken").unwrap();

    let state = EffectsState::new(Box::new(Preferences::new(&path)));
    assert!(state.custom_presets().is_empty());
}

#[test]
fn sync_from_adopts_engine_values() {
    let (mut state, _) = state();
    let mut engine = FakeEngine::new();
    engine.bands = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0];
    engine.bass = 2.0;
    engine.balance = 0.5;

    state.sync_from(&engine);
    assert_eq!(state.bands()[0], 1.0);
    assert_eq!(state.bands()[6], -1.0);
    assert_eq!(state.bass_boost(), 2.0);
    assert_eq!(state.balance(), 0.5);
    assert_eq!(engine.eq_pushes, 0);
}
