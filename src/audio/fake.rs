use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::EngineError;

use super::engine::Engine;
use super::types::{EQ_BAND_COUNT, EqBands};

/// Scriptable in-memory engine for unit tests.
///
/// Time only moves when a test calls [`FakeEngine::advance`].
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub duration: Duration,
    pub position: Duration,
    pub playing: bool,
    pub volume: f32,
    pub bands: EqBands,
    pub bass: f32,
    pub treble: f32,
    pub reverb: f32,
    pub balance: f32,
    pub loaded: Option<PathBuf>,
    pub fail_load: bool,
    pub refuse_play: bool,
    pub reject_effects: bool,
    pub completion: bool,
    pub eq_pushes: usize,
    pub calls: Vec<&'static str>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            duration: Duration::from_secs(10),
            volume: 1.0,
            ..Self::default()
        }
    }

    pub fn with_duration(secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(secs),
            ..Self::new()
        }
    }

    /// Move the play head forward when playing, capped at the duration.
    pub fn advance(&mut self, by: Duration) {
        if self.playing {
            self.position = (self.position + by).min(self.duration);
        }
    }

    fn check(&self, parameter: &'static str) -> Result<(), EngineError> {
        if self.reject_effects {
            return Err(EngineError::Rejected {
                parameter,
                reason: "rejected by test".to_string(),
            });
        }
        Ok(())
    }
}

impl Engine for FakeEngine {
    fn load(&mut self, path: &Path) -> Result<Duration, EngineError> {
        self.calls.push("load");
        if self.fail_load {
            return Err(EngineError::Load {
                path: path.to_path_buf(),
                reason: "unreadable".to_string(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        self.position = Duration::ZERO;
        self.playing = false;
        Ok(self.duration)
    }

    fn play(&mut self) -> bool {
        self.calls.push("play");
        if self.refuse_play || self.loaded.is_none() {
            return false;
        }
        self.playing = true;
        true
    }

    fn pause(&mut self) -> bool {
        self.calls.push("pause");
        self.playing = false;
        true
    }

    fn stop(&mut self) -> bool {
        self.calls.push("stop");
        self.playing = false;
        self.position = Duration::ZERO;
        true
    }

    fn seek(&mut self, position: Duration) {
        self.calls.push("seek");
        self.position = position.min(self.duration);
    }

    fn current_time(&self) -> Duration {
        self.position
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_eq_bands(&mut self, gains: &EqBands) -> Result<(), EngineError> {
        self.check("eq")?;
        self.eq_pushes += 1;
        self.bands = *gains;
        Ok(())
    }

    fn eq_band(&self, index: usize) -> f32 {
        if index < EQ_BAND_COUNT { self.bands[index] } else { 0.0 }
    }

    fn set_bass(&mut self, value: f32) -> Result<(), EngineError> {
        self.check("bass")?;
        self.bass = value;
        Ok(())
    }

    fn bass(&self) -> f32 {
        self.bass
    }

    fn set_treble(&mut self, value: f32) -> Result<(), EngineError> {
        self.check("treble")?;
        self.treble = value;
        Ok(())
    }

    fn treble(&self) -> f32 {
        self.treble
    }

    fn set_reverb_room_size(&mut self, value: f32) -> Result<(), EngineError> {
        self.check("reverb")?;
        self.reverb = value;
        Ok(())
    }

    fn reverb_room_size(&self) -> f32 {
        self.reverb
    }

    fn set_balance(&mut self, value: f32) -> Result<(), EngineError> {
        self.check("balance")?;
        self.balance = value;
        Ok(())
    }

    fn balance(&self) -> f32 {
        self.balance
    }

    fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.completion)
    }
}
