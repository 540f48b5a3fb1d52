//! Durable JSON storage helpers.
//!
//! Every document is rewritten in full: encode, write a sibling `.tmp` file,
//! then rename it over the target. Readers therefore only ever observe the
//! previous or the next complete document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PersistenceError;

/// Read and decode a JSON document. `Ok(None)` means the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(path).map_err(|source| PersistenceError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| PersistenceError::DecodeFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Encode `value` and atomically replace the document at `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), PersistenceError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::EncodeFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let write_failed = |source| PersistenceError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
    }

    let temp = temp_path(path);
    {
        let file = File::create(&temp).map_err(write_failed)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes).map_err(write_failed)?;
        writer.flush().map_err(write_failed)?;
    }

    fs::rename(&temp, path).map_err(write_failed)?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// A small key-value store backed by one JSON object on disk.
///
/// Values are arbitrary JSON; each `set`/`remove` rewrites the whole object.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        let mut entries = self.entries()?;
        let Some(value) = entries.remove(key) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| PersistenceError::DecodeFailed {
                path: self.path.clone(),
                source,
            })
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(value).map_err(|source| PersistenceError::EncodeFailed {
            path: self.path.clone(),
            source,
        })?;
        let mut entries = self.entries()?;
        entries.insert(key.to_string(), value);
        write_json_atomic(&self.path, &entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries()?;
        if entries.remove(key).is_some() {
            write_json_atomic(&self.path, &entries)?;
        }
        Ok(())
    }

    fn entries(&self) -> Result<Map<String, Value>, PersistenceError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn read_json_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let got: Option<Vec<u32>> = read_json(&dir.path().join("nope.json")).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn write_json_atomic_replaces_document_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();
        write_json_atomic(&path, &vec![4]).unwrap();

        let got: Vec<u32> = read_json(&path).unwrap().unwrap();
        assert_eq!(got, vec![4]);
        assert!(!dir.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn read_json_reports_decode_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = read_json::<Vec<u32>>(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::DecodeFailed { .. }));
    }

    #[test]
    fn preferences_keep_unrelated_keys() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::new(dir.path().join("prefs.json"));

        prefs.set("volume", &0.5f32).unwrap();
        let mut table = BTreeMap::new();
        table.insert("Mine".to_string(), vec![1.0f32, 2.0]);
        prefs.set("presets", &table).unwrap();

        assert_eq!(prefs.get::<f32>("volume").unwrap(), Some(0.5));
        assert_eq!(
            prefs.get::<BTreeMap<String, Vec<f32>>>("presets").unwrap(),
            Some(table)
        );

        prefs.remove("volume").unwrap();
        assert_eq!(prefs.get::<f32>("volume").unwrap(), None);
        assert!(prefs.get::<BTreeMap<String, Vec<f32>>>("presets").unwrap().is_some());
    }
}
