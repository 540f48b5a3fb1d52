use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::EngineError;

use super::engine::Engine;
use super::sink::{PreparedSink, create_sink_at};
use super::types::{EQ_BAND_COUNT, EqBands};

/// Effect parameters the engine retains across loads.
///
/// Rendering of these (filters, reverb, panning) is outside this crate; the
/// engine stores them so the session can read back its defaults.
#[derive(Debug, Clone, Default)]
struct Parameters {
    eq: EqBands,
    bass: f32,
    treble: f32,
    room_size: f32,
    balance: f32,
}

/// [`Engine`] implementation on top of a `rodio` output stream.
pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    /// Position the current sink started at (sinks rebuilt with a skip count from zero).
    offset: Duration,
    volume: f32,
    params: Parameters,
    playing: bool,
    completion_pending: bool,
}

impl RodioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            path: None,
            offset: Duration::ZERO,
            volume: 1.0,
            params: Parameters::default(),
            playing: false,
            completion_pending: false,
        })
    }

    fn rebuild_at(&mut self, position: Duration) -> Result<(), EngineError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let PreparedSink { sink, .. } = create_sink_at(&self.stream, &path, position)?;
        sink.set_volume(self.volume);
        if self.playing {
            sink.play();
        }
        self.sink = Some(sink);
        self.offset = position;
        self.completion_pending = false;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_none_or(|s| s.empty())
    }
}

impl Engine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<Duration, EngineError> {
        let PreparedSink { sink, duration } = create_sink_at(&self.stream, path, Duration::ZERO)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        sink.set_volume(self.volume);
        self.sink = Some(sink);
        self.path = Some(path.to_path_buf());
        self.offset = Duration::ZERO;
        self.playing = false;
        self.completion_pending = false;
        log::debug!("engine loaded {}", path.display());
        Ok(duration.unwrap_or_default())
    }

    fn play(&mut self) -> bool {
        if self.path.is_none() {
            return false;
        }
        self.playing = true;
        if self.is_finished() {
            if let Err(e) = self.rebuild_at(Duration::ZERO) {
                log::warn!("cannot restart playback: {e}");
                self.playing = false;
                return false;
            }
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        true
    }

    fn pause(&mut self) -> bool {
        match &self.sink {
            Some(sink) => {
                sink.pause();
                self.playing = false;
                true
            }
            None => false,
        }
    }

    fn stop(&mut self) -> bool {
        if self.path.is_none() {
            return false;
        }
        self.playing = false;
        self.completion_pending = false;
        // Rebuilding leaves a paused sink at zero, ready for the next `play`.
        match self.rebuild_at(Duration::ZERO) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("cannot rewind after stop: {e}");
                false
            }
        }
    }

    fn seek(&mut self, position: Duration) {
        let seeked = !self.is_finished()
            && self
                .sink
                .as_ref()
                .is_some_and(|sink| sink.try_seek(position).is_ok());
        if seeked {
            self.offset = Duration::ZERO;
            return;
        }
        if let Err(e) = self.rebuild_at(position) {
            log::warn!("seek to {:?} failed: {e}", position);
        }
    }

    fn current_time(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |sink| self.offset + sink.get_pos())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn set_eq_bands(&mut self, gains: &EqBands) -> Result<(), EngineError> {
        self.params.eq = *gains;
        Ok(())
    }

    fn eq_band(&self, index: usize) -> f32 {
        if index < EQ_BAND_COUNT {
            self.params.eq[index]
        } else {
            0.0
        }
    }

    fn set_bass(&mut self, value: f32) -> Result<(), EngineError> {
        self.params.bass = value;
        Ok(())
    }

    fn bass(&self) -> f32 {
        self.params.bass
    }

    fn set_treble(&mut self, value: f32) -> Result<(), EngineError> {
        self.params.treble = value;
        Ok(())
    }

    fn treble(&self) -> f32 {
        self.params.treble
    }

    fn set_reverb_room_size(&mut self, value: f32) -> Result<(), EngineError> {
        self.params.room_size = value;
        Ok(())
    }

    fn reverb_room_size(&self) -> f32 {
        self.params.room_size
    }

    fn set_balance(&mut self, value: f32) -> Result<(), EngineError> {
        self.params.balance = value;
        Ok(())
    }

    fn balance(&self) -> f32 {
        self.params.balance
    }

    fn take_completion(&mut self) -> bool {
        if self.playing && !self.completion_pending && self.is_finished() {
            self.completion_pending = true;
            return true;
        }
        false
    }
}
