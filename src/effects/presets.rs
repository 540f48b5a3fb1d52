use crate::audio::EqBands;

/// Built-in equalizer curves, gains in dB for each band.
pub const BUILTIN_PRESETS: &[(&str, EqBands)] = &[
    ("Flat", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("Bass Boost", [6.0, 4.0, 2.0, 0.0, 0.0, 0.0, 0.0]),
    ("Treble Boost", [0.0, 0.0, 0.0, 0.0, 2.0, 4.0, 6.0]),
    ("Rock", [4.0, 2.0, -1.0, 0.0, 2.0, 4.0, 5.0]),
    ("Pop", [-1.0, 1.0, 3.0, 4.0, 3.0, 1.0, -1.0]),
    ("Jazz", [3.0, 1.0, -2.0, 0.0, 2.0, 4.0, 5.0]),
    ("Classical", [4.0, 3.0, 0.0, 0.0, 0.0, 2.0, 4.0]),
    ("Electronic", [5.0, 4.0, 0.0, -2.0, 0.0, 4.0, 5.0]),
    ("Hip Hop", [5.0, 4.0, 1.0, 0.0, -1.0, 2.0, 3.0]),
    ("Acoustic", [4.0, 2.0, 0.0, 1.0, 2.0, 3.0, 3.0]),
    ("Vocal", [-2.0, 0.0, 2.0, 4.0, 3.0, 1.0, 0.0]),
    ("Loudness", [5.0, 3.0, 0.0, 0.0, 0.0, 2.0, 4.0]),
];

pub fn builtin_preset(name: &str) -> Option<EqBands> {
    BUILTIN_PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, bands)| *bands)
}

/// Preset names in alphabetical order.
pub fn builtin_preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTIN_PRESETS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}
