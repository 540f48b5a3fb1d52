use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::display::{format_byte_count, format_clock};

/// One imported audio file and everything known about it.
///
/// `id`, the technical attributes and `date_added` are fixed at import; the
/// free-text fields are edited through the library store, which also keeps
/// `file_name` unique and stamps `date_modified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    pub id: Uuid,
    pub file_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub comments: String,
    pub file_extension: String,
    pub file_size_bytes: u64,
    pub duration_secs: f64,
    pub sample_rate_hz: u32,
    pub channel_count: u16,
    pub bitrate_kbps: u32,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl TrackMetadata {
    /// Fresh metadata for a file with no tag information yet.
    pub fn new(file_name: impl Into<String>, file_size_bytes: u64, date_added: DateTime<Utc>) -> Self {
        let file_name = file_name.into();
        let file_extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        Self {
            id: Uuid::new_v4(),
            file_name,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            genre: String::new(),
            year: String::new(),
            comments: String::new(),
            file_extension,
            file_size_bytes,
            duration_secs: 0.0,
            sample_rate_hz: 0,
            channel_count: 2,
            bitrate_kbps: 0,
            date_added,
            date_modified: Utc::now(),
        }
    }

    /// Location of the backing file inside the managed audio directory.
    pub fn file_path(&self, audio_dir: &Path) -> PathBuf {
        audio_dir.join(&self.file_name)
    }

    /// Title if set, otherwise the file name without its extension.
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
            .to_string()
    }

    pub fn display_artist(&self) -> &str {
        if self.artist.is_empty() {
            "Unknown Artist"
        } else {
            &self.artist
        }
    }

    pub fn duration_formatted(&self) -> String {
        format_clock(self.duration_secs)
    }

    pub fn file_size_formatted(&self) -> String {
        format_byte_count(self.file_size_bytes)
    }

    pub fn bitrate_formatted(&self) -> String {
        format!("{} kbps", self.bitrate_kbps)
    }

    /// e.g. `MP3 • 44kHz • Stereo`
    pub fn format_description(&self) -> String {
        let mut parts = vec![self.file_extension.to_uppercase()];
        if self.sample_rate_hz > 0 {
            parts.push(format!("{}kHz", self.sample_rate_hz / 1000));
        }
        parts.push(if self.channel_count == 1 { "Mono" } else { "Stereo" }.to_string());
        parts.join(" • ")
    }
}

/// Bitrate in kbps derived from size and duration; 0 when the duration is unknown.
pub fn derive_bitrate_kbps(file_size_bytes: u64, duration_secs: f64) -> u32 {
    if duration_secs > 0.0 && file_size_bytes > 0 {
        (file_size_bytes as f64 * 8.0 / duration_secs / 1000.0) as u32
    } else {
        0
    }
}

/// Keys the library can be sorted by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortKey {
    DateAdded,
    Title,
    Artist,
    Album,
    Duration,
    FileSize,
}

/// Partial metadata edit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub comments: Option<String>,
}

impl MetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.genre.is_none()
            && self.year.is_none()
            && self.comments.is_none()
    }

    pub(super) fn apply_to(self, song: &mut TrackMetadata) {
        let fields = [
            (self.title, &mut song.title),
            (self.artist, &mut song.artist),
            (self.album, &mut song.album),
            (self.genre, &mut song.genre),
            (self.year, &mut song.year),
            (self.comments, &mut song.comments),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}
