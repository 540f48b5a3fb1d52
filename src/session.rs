//! Playback session controller and sleep timer.
//!
//! [`PlaybackSession`] is the state machine the runtime drives; it owns the
//! engine, the effect state and the [`SleepTimer`].

mod controller;
mod sleep_timer;

pub use controller::PlaybackSession;
pub use sleep_timer::{DEFAULT_FADE_WINDOW, DEFAULT_TICK, SleepTick, SleepTimer};
