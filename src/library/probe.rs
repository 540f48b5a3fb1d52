//! Technical attribute and tag extraction for imported files.

use std::path::Path;

use lofty::prelude::*;
use lofty::tag::Tag;

/// Stream properties read from the file headers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioProperties {
    pub duration_secs: f64,
    pub sample_rate_hz: u32,
    pub channel_count: u16,
}

/// Descriptive tags; empty strings mean "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: String,
}

/// Best-effort reader for audio properties and embedded tags.
///
/// Both methods return `None` when the file cannot be understood; callers
/// fall back to defaults rather than failing.
pub trait MetadataProbe {
    fn properties(&self, path: &Path) -> Option<AudioProperties>;
    fn tags(&self, path: &Path) -> Option<TagFields>;
}

/// [`MetadataProbe`] backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProbe;

impl MetadataProbe for LoftyProbe {
    fn properties(&self, path: &Path) -> Option<AudioProperties> {
        let tagged = lofty::read_from_path(path).ok()?;
        let props = tagged.properties();
        Some(AudioProperties {
            duration_secs: props.duration().as_secs_f64(),
            sample_rate_hz: props.sample_rate().unwrap_or(0),
            channel_count: props.channels().map(u16::from).unwrap_or(2),
        })
    }

    fn tags(&self, path: &Path) -> Option<TagFields> {
        let tagged = lofty::read_from_path(path).ok()?;
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
        Some(tag_fields(tag))
    }
}

fn tag_fields(tag: &Tag) -> TagFields {
    let text = |v: Option<std::borrow::Cow<'_, str>>| {
        v.map(|s| s.trim().to_string()).unwrap_or_default()
    };

    let year = tag
        .items()
        .find(|item| matches!(item.key(), ItemKey::Year | ItemKey::RecordingDate))
        .and_then(|item| item.value().text())
        .map(normalize_year)
        .unwrap_or_default();

    TagFields {
        title: text(tag.title()),
        artist: text(tag.artist()),
        album: text(tag.album()),
        genre: text(tag.genre()),
        year,
    }
}

/// Keep the leading four characters (`"1999-04-01"` -> `"1999"`).
pub(super) fn normalize_year(raw: &str) -> String {
    raw.trim().chars().take(4).collect()
}
