//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::EngineError;

/// A paused sink plus the total duration of the decoded source, if known.
pub(super) struct PreparedSink {
    pub sink: Sink,
    pub duration: Option<Duration>,
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<PreparedSink, EngineError> {
    let load_failed = |reason: String| EngineError::Load {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_failed(e.to_string()))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| load_failed(e.to_string()))?;
    let duration = decoder.total_duration().or_else(|| probe_duration(path));

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(PreparedSink { sink, duration })
}

/// Many compressed formats cannot report their length from the decoder alone.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
