//! Equalizer and effect parameters.
//!
//! [`EffectsState`] mirrors what the engine was last told and owns the custom
//! preset table; [`Effects`] pairs it with an engine so every change is pushed
//! as it happens.

mod presets;
mod state;
mod store;

pub use presets::{BUILTIN_PRESETS, builtin_preset, builtin_preset_names};
pub use state::{Effects, EffectsState};
pub use store::{CUSTOM_PRESETS_KEY, PresetStore};

#[cfg(test)]
mod tests;
