use super::types::{EQ_BAND_COUNT, EQ_FREQUENCIES_HZ, PlaybackState, RepeatMode};

#[test]
fn repeat_mode_cycles_off_one_all() {
    assert_eq!(RepeatMode::Off.next(), RepeatMode::One);
    assert_eq!(RepeatMode::One.next(), RepeatMode::All);
    assert_eq!(RepeatMode::All.next(), RepeatMode::Off);
    assert_eq!(RepeatMode::default(), RepeatMode::Off);
}

#[test]
fn eq_layout_is_seven_fixed_bands() {
    assert_eq!(EQ_FREQUENCIES_HZ.len(), EQ_BAND_COUNT);
    assert_eq!(EQ_FREQUENCIES_HZ[0], 60.0);
    assert_eq!(EQ_FREQUENCIES_HZ[6], 16000.0);
}

#[test]
fn playback_state_defaults_to_idle() {
    assert_eq!(PlaybackState::default(), PlaybackState::Idle);
}
