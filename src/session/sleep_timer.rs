use std::time::Duration;

use crate::audio::Engine;
use crate::library::format_clock;

/// Length of the volume ramp before the timer expires.
pub const DEFAULT_FADE_WINDOW: Duration = Duration::from_secs(30);
/// How much time one tick takes off the countdown.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Outcome of one [`SleepTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SleepTick {
    /// No timer is armed.
    Inactive,
    Running { remaining: Duration },
    /// The countdown reached zero and the timer disarmed itself. The caller
    /// pauses playback and then restores `volume`.
    Expired { volume: f32 },
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    total: Duration,
    remaining: Duration,
    pre_fade_volume: f32,
    fade_out: bool,
}

/// Countdown that fades the engine out and ends the session.
///
/// At most one countdown is armed at a time; starting a new one fully unwinds
/// the previous one first.
#[derive(Debug, Clone)]
pub struct SleepTimer {
    countdown: Option<Countdown>,
    fade_window: Duration,
    step: Duration,
}

impl Default for SleepTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_WINDOW, DEFAULT_TICK)
    }
}

impl SleepTimer {
    pub fn new(fade_window: Duration, step: Duration) -> Self {
        Self {
            countdown: None,
            fade_window,
            step,
        }
    }

    /// Arm for `duration`, capturing the engine's current volume.
    pub fn start<E: Engine + ?Sized>(&mut self, engine: &mut E, duration: Duration, fade_out: bool) {
        self.cancel(engine);
        let pre_fade_volume = engine.volume();
        self.countdown = Some(Countdown {
            total: duration,
            remaining: duration,
            pre_fade_volume,
            fade_out,
        });
        log::info!("sleep timer set for {}", format_clock(duration.as_secs_f64()));
    }

    /// Advance the countdown by one step.
    pub fn tick<E: Engine + ?Sized>(&mut self, engine: &mut E) -> SleepTick {
        let Some(countdown) = self.countdown.as_mut() else {
            return SleepTick::Inactive;
        };

        countdown.remaining = countdown.remaining.saturating_sub(self.step);
        let remaining = countdown.remaining;

        if remaining.is_zero() {
            let volume = countdown.pre_fade_volume;
            self.countdown = None;
            log::info!("sleep timer expired");
            return SleepTick::Expired { volume };
        }

        if countdown.fade_out && !self.fade_window.is_zero() && remaining <= self.fade_window {
            let fraction = remaining.as_secs_f32() / self.fade_window.as_secs_f32();
            engine.set_volume(countdown.pre_fade_volume * fraction);
        }

        SleepTick::Running { remaining }
    }

    /// Disarm and put the pre-fade volume back, however far the fade got.
    pub fn cancel<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        if let Some(countdown) = self.countdown.take() {
            engine.set_volume(countdown.pre_fade_volume);
            log::debug!("sleep timer cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Zero when inactive.
    pub fn remaining(&self) -> Duration {
        self.countdown.map_or(Duration::ZERO, |c| c.remaining)
    }

    pub fn total(&self) -> Option<Duration> {
        self.countdown.map(|c| c.total)
    }

    pub fn remaining_formatted(&self) -> String {
        format_clock(self.remaining().as_secs_f64())
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}
