//! Audio-related small types and constants.
//!
//! This module defines the playback state machine states, the repeat mode
//! and the fixed equalizer layout shared by the engine and the effects state.

/// Number of equalizer bands.
pub const EQ_BAND_COUNT: usize = 7;

/// Center frequency of each equalizer band, in Hz.
pub const EQ_FREQUENCIES_HZ: [f32; EQ_BAND_COUNT] = [60.0, 150.0, 400.0, 1100.0, 3100.0, 8000.0, 16000.0];

/// Gain for every band, in dB.
pub type EqBands = [f32; EQ_BAND_COUNT];

/// The playback state of a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been loaded yet.
    #[default]
    Idle,
    /// A track is loaded and positioned, but not playing.
    Loaded,
    Playing,
    Paused,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop when the track ends.
    #[default]
    Off,
    /// Restart the current track when it ends.
    One,
    /// Restart from the beginning of the session when it ends.
    ///
    /// A session holds a single track, so this currently behaves like `One`.
    All,
}

impl RepeatMode {
    /// Cycle `Off -> One -> All -> Off`.
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::One => "One",
            Self::All => "All",
        }
    }
}
