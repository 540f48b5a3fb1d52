//! Library module: the managed audio directory and its metadata document.
//!
//! [`LibraryStore`] owns import, rename, delete, search and statistics;
//! [`TrackMetadata`] is the persisted record for one imported file.

mod display;
mod document;
mod model;
mod probe;
mod scan;
mod store;

pub use display::{format_byte_count, format_clock, format_total_duration};
pub use document::{JsonDocument, MetadataDocument};
pub use model::{MetadataUpdate, SortKey, TrackMetadata, derive_bitrate_kbps};
pub use probe::{AudioProperties, LoftyProbe, MetadataProbe, TagFields};
pub use scan::{is_audio_file, list_audio_files};
pub use store::LibraryStore;
