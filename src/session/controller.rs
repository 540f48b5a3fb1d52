use std::path::{Path, PathBuf};
use std::time::Duration;

use uuid::Uuid;

use crate::audio::{Engine, PlaybackState, RepeatMode};
use crate::effects::{Effects, EffectsState};
use crate::error::EngineError;
use crate::library::{LibraryStore, format_clock};

use super::sleep_timer::{SleepTick, SleepTimer};

#[derive(Debug, Clone)]
struct CurrentTrack {
    path: PathBuf,
    title: Option<String>,
    artist: Option<String>,
    song_id: Option<Uuid>,
}

/// One track's worth of playback on top of an [`Engine`].
///
/// All methods run on the caller's thread. The owner drives two periodic
/// tasks: [`poll_position`](Self::poll_position) while
/// [`is_polling`](Self::is_polling), and
/// [`tick_sleep_timer`](Self::tick_sleep_timer) while the sleep timer is armed.
pub struct PlaybackSession<E: Engine> {
    engine: E,
    state: PlaybackState,
    current: Option<CurrentTrack>,
    current_time: Duration,
    duration: Duration,
    repeat_mode: RepeatMode,
    polling: bool,
    // Set once track-end handling ran for the current crossing.
    end_latched: bool,
    effects: EffectsState,
    sleep_timer: SleepTimer,
    last_error: Option<EngineError>,
}

impl<E: Engine> PlaybackSession<E> {
    pub fn new(engine: E, effects: EffectsState) -> Self {
        Self {
            engine,
            state: PlaybackState::Idle,
            current: None,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            repeat_mode: RepeatMode::Off,
            polling: false,
            end_latched: false,
            effects,
            sleep_timer: SleepTimer::default(),
            last_error: None,
        }
    }

    /// Replace the sleep timer, e.g. to use a configured fade window.
    pub fn with_sleep_timer(mut self, sleep_timer: SleepTimer) -> Self {
        self.sleep_timer = sleep_timer;
        self
    }

    /// Open `path`. On failure nothing changes except the last error.
    pub fn load(&mut self, path: &Path, title: Option<&str>, artist: Option<&str>) -> bool {
        match self.engine.load(path) {
            Ok(duration) => {
                self.current = Some(CurrentTrack {
                    path: path.to_path_buf(),
                    title: title.map(str::to_string),
                    artist: artist.map(str::to_string),
                    song_id: None,
                });
                self.state = PlaybackState::Loaded;
                self.current_time = Duration::ZERO;
                self.duration = duration;
                self.polling = false;
                self.end_latched = false;
                self.last_error = None;
                self.effects.sync_from(&self.engine);
                log::info!("loaded {} ({})", path.display(), self.duration_formatted());
                true
            }
            Err(e) => {
                log::warn!("load failed: {e}");
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Load a library entry by id.
    pub fn load_song(&mut self, library: &LibraryStore, id: Uuid) -> bool {
        let Some(song) = library.get_song(id) else {
            log::warn!("no library entry with id {id}");
            return false;
        };
        let path = song.file_path(library.audio_dir());
        let title = song.display_title();
        let artist = song.display_artist().to_string();
        if !self.load(&path, Some(&title), Some(&artist)) {
            return false;
        }
        if let Some(current) = self.current.as_mut() {
            current.song_id = Some(id);
        }
        true
    }

    pub fn play(&mut self) -> bool {
        if self.state == PlaybackState::Idle {
            return false;
        }
        if !self.engine.play() {
            log::warn!("engine refused to play");
            return false;
        }
        self.state = PlaybackState::Playing;
        self.polling = true;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        if !self.engine.pause() {
            return false;
        }
        self.current_time = self.clamped(self.engine.current_time());
        self.state = PlaybackState::Paused;
        self.polling = false;
        true
    }

    /// Rewind to zero and stop polling. Valid in every state.
    pub fn stop(&mut self) {
        if self.current.is_some() {
            self.engine.stop();
            self.state = PlaybackState::Loaded;
        } else {
            self.state = PlaybackState::Idle;
        }
        self.current_time = Duration::ZERO;
        self.polling = false;
        self.end_latched = false;
    }

    pub fn toggle_play_pause(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Move to `position`, clamped to the track. Takes effect immediately.
    pub fn seek(&mut self, position: Duration) {
        if self.state == PlaybackState::Idle {
            return;
        }
        let position = self.clamped(position);
        self.engine.seek(position);
        self.current_time = position;
        if position < self.duration {
            self.end_latched = false;
        }
    }

    /// Seek to a fraction of the duration. Values outside `0..=1` are clamped.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.seek(self.duration.mul_f64(fraction));
    }

    /// Read back the engine position and handle the end of the track.
    ///
    /// A crossing of the end (by position or by the engine's own completion
    /// signal) is handled once; the latch re-arms when the position drops
    /// back below the end.
    pub fn poll_position(&mut self) {
        if !self.polling || self.state != PlaybackState::Playing {
            return;
        }

        let now = self.engine.current_time();
        self.current_time = self.clamped(now);

        let reached_end = !self.duration.is_zero() && now >= self.duration;
        let completed = self.engine.take_completion();

        if !(reached_end || completed) {
            self.end_latched = false;
            return;
        }
        if self.end_latched {
            return;
        }
        self.end_latched = true;
        self.handle_track_end();
    }

    fn handle_track_end(&mut self) {
        match self.repeat_mode {
            RepeatMode::Off => {
                log::debug!("track ended");
                self.stop();
            }
            // A session holds one track, so All restarts it like One.
            RepeatMode::One | RepeatMode::All => {
                log::debug!("track ended, repeating");
                self.engine.seek(Duration::ZERO);
                self.current_time = Duration::ZERO;
                if !self.engine.play() {
                    log::warn!("engine refused to restart the track");
                    self.stop();
                }
            }
        }
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat_mode = self.repeat_mode.next();
        self.repeat_mode
    }

    pub fn start_sleep_timer(&mut self, duration: Duration, fade_out: bool) {
        self.sleep_timer.start(&mut self.engine, duration, fade_out);
    }

    pub fn cancel_sleep_timer(&mut self) {
        self.sleep_timer.cancel(&mut self.engine);
    }

    /// One sleep-timer step. Pauses playback when the countdown expires.
    pub fn tick_sleep_timer(&mut self) -> SleepTick {
        let tick = self.sleep_timer.tick(&mut self.engine);
        if let SleepTick::Expired { volume } = tick {
            self.pause();
            self.engine.set_volume(volume);
        }
        tick
    }

    pub fn sleep_timer(&self) -> &SleepTimer {
        &self.sleep_timer
    }

    pub fn effects(&self) -> &EffectsState {
        &self.effects
    }

    /// Effect controls bound to this session's engine.
    pub fn effects_mut(&mut self) -> Effects<'_, E> {
        self.effects.control(&mut self.engine)
    }

    /// Drop the current track and return to `Idle`.
    pub fn eject(&mut self) {
        if self.current.take().is_some() {
            self.engine.stop();
        }
        self.state = PlaybackState::Idle;
        self.current_time = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.polling = false;
        self.end_latched = false;
    }

    /// Eject if `id` is the loaded library entry, e.g. before deleting it.
    pub fn eject_if_playing(&mut self, id: Uuid) -> bool {
        let loaded = self
            .current
            .as_ref()
            .is_some_and(|c| c.song_id == Some(id));
        if loaded {
            self.eject();
        }
        loaded
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fraction of the track played, 0 when the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.current_time.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn current_time_formatted(&self) -> String {
        format_clock(self.current_time.as_secs_f64())
    }

    pub fn duration_formatted(&self) -> String {
        format_clock(self.duration.as_secs_f64())
    }

    pub fn remaining_time_formatted(&self) -> String {
        let remaining = self.duration.saturating_sub(self.current_time);
        format!("-{}", format_clock(remaining.as_secs_f64()))
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.path.as_path())
    }

    pub fn current_song_id(&self) -> Option<Uuid> {
        self.current.as_ref().and_then(|c| c.song_id)
    }

    /// The title given at load time, else the file name.
    pub fn title(&self) -> Option<String> {
        let current = self.current.as_ref()?;
        current
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                current
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
    }

    pub fn artist(&self) -> Option<&str> {
        self.current.as_ref()?.artist.as_deref()
    }

    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn clamped(&self, position: Duration) -> Duration {
        position.min(self.duration)
    }
}
