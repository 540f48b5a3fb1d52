use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::persist::{read_json, write_json_atomic};

use super::model::TrackMetadata;

/// Persistence port for the library's metadata document.
pub trait MetadataDocument {
    /// `Ok(None)` when no document has been written yet.
    fn load(&self) -> Result<Option<Vec<TrackMetadata>>, PersistenceError>;
    /// Replace the whole document with `songs`.
    fn save(&mut self, songs: &[TrackMetadata]) -> Result<(), PersistenceError>;
}

/// The on-disk JSON array next to the managed audio directory.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataDocument for JsonDocument {
    fn load(&self) -> Result<Option<Vec<TrackMetadata>>, PersistenceError> {
        read_json(&self.path)
    }

    fn save(&mut self, songs: &[TrackMetadata]) -> Result<(), PersistenceError> {
        write_json_atomic(&self.path, songs)
    }
}
