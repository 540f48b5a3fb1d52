use std::path::Path;
use std::time::Duration;

use crate::error::EngineError;

use super::types::EqBands;

/// The native decode/render engine as seen by the session.
///
/// Every call is synchronous and expected to return quickly. Parameter
/// setters report whether the engine accepted the value; getters return the
/// engine's current (possibly persisted) value.
pub trait Engine {
    /// Open `path` for playback, returning its duration.
    fn load(&mut self, path: &Path) -> Result<Duration, EngineError>;
    fn play(&mut self) -> bool;
    fn pause(&mut self) -> bool;
    fn stop(&mut self) -> bool;
    fn seek(&mut self, position: Duration);
    fn current_time(&self) -> Duration;

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    /// Push the full band vector in one call.
    fn set_eq_bands(&mut self, gains: &EqBands) -> Result<(), EngineError>;
    fn eq_band(&self, index: usize) -> f32;

    fn set_bass(&mut self, value: f32) -> Result<(), EngineError>;
    fn bass(&self) -> f32;
    fn set_treble(&mut self, value: f32) -> Result<(), EngineError>;
    fn treble(&self) -> f32;
    fn set_reverb_room_size(&mut self, value: f32) -> Result<(), EngineError>;
    fn reverb_room_size(&self) -> f32;
    fn set_balance(&mut self, value: f32) -> Result<(), EngineError>;
    fn balance(&self) -> f32;

    /// Returns `true` exactly once after the engine itself reached end-of-stream.
    fn take_completion(&mut self) -> bool;
}
