use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{DeleteError, ImportError, LibraryError, RenameError};

use super::display::{format_byte_count, format_total_duration};
use super::document::MetadataDocument;
use super::model::{MetadataUpdate, SortKey, TrackMetadata, derive_bitrate_kbps};
use super::probe::MetadataProbe;
use super::scan::list_audio_files;

/// The managed track collection: a flat audio directory plus a metadata
/// document that must agree with it.
///
/// Songs are kept newest-import-first. Every mutation rewrites the whole
/// document; failures land in [`LibraryStore::last_error`] instead of
/// propagating.
pub struct LibraryStore {
    audio_dir: PathBuf,
    extensions: Vec<String>,
    document: Box<dyn MetadataDocument>,
    probe: Box<dyn MetadataProbe>,
    songs: Vec<TrackMetadata>,
    last_error: Option<LibraryError>,
}

impl LibraryStore {
    /// Open the library and reconcile it with the audio directory.
    ///
    /// Without a readable document every supported file already in
    /// `audio_dir` is adopted; with one, entries whose file disappeared are
    /// dropped.
    pub fn open(
        audio_dir: impl Into<PathBuf>,
        extensions: Vec<String>,
        document: Box<dyn MetadataDocument>,
        probe: Box<dyn MetadataProbe>,
    ) -> Self {
        let mut store = Self {
            audio_dir: audio_dir.into(),
            extensions,
            document,
            probe,
            songs: Vec::new(),
            last_error: None,
        };

        if let Err(e) = fs::create_dir_all(&store.audio_dir) {
            log::warn!(
                "cannot create audio directory {}: {e}",
                store.audio_dir.display()
            );
        }

        match store.document.load() {
            Ok(Some(songs)) => {
                store.songs = songs;
                store.validate();
            }
            Ok(None) => {
                log::info!("no library document yet, adopting existing files");
                store.migrate_existing_files();
            }
            Err(e) => {
                log::warn!("library document unreadable, rebuilding from files: {e}");
                store.last_error = Some(e.into());
                store.migrate_existing_files();
            }
        }

        log::debug!("library opened with {} songs", store.songs.len());
        store
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// All songs in insertion order (newest import first).
    pub fn songs(&self) -> &[TrackMetadata] {
        &self.songs
    }

    pub fn last_error(&self) -> Option<&LibraryError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Copy `source` into the library and register it.
    ///
    /// Name collisions get a ` (n)` suffix; missing tags leave fields empty.
    pub fn import_file(&mut self, source: &Path) -> Result<TrackMetadata, ImportError> {
        self.last_error = None;
        self.try_import(source).inspect_err(|e| {
            log::warn!("import of {} failed: {e}", source.display());
        })
    }

    /// Import each path independently; failures are skipped and the most
    /// recent one is kept in the error slot.
    pub fn import_files<P: AsRef<Path>>(&mut self, sources: &[P]) -> Vec<TrackMetadata> {
        let mut imported = Vec::with_capacity(sources.len());
        let mut failure = None;
        for source in sources {
            match self.import_file(source.as_ref()) {
                Ok(song) => imported.push(song),
                Err(e) => failure = Some(e),
            }
        }
        if let Some(e) = failure {
            self.last_error = Some(e.into());
        }
        imported
    }

    fn try_import(&mut self, source: &Path) -> Result<TrackMetadata, ImportError> {
        // Holding the handle for the duration of the copy is our read-access scope.
        let _access = File::open(source).map_err(|e| ImportError::AccessDenied {
            path: source.to_path_buf(),
            source: e,
        })?;

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImportError::AccessDenied {
                path: source.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file name is not valid UTF-8",
                ),
            })?;

        fs::create_dir_all(&self.audio_dir).map_err(|e| ImportError::CopyFailed {
            path: source.to_path_buf(),
            source: e,
        })?;

        let destination = unique_destination(&self.audio_dir, file_name);
        fs::copy(source, &destination).map_err(|e| ImportError::CopyFailed {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut song = match self.create_metadata(&destination, Utc::now()) {
            Ok(song) => song,
            Err(e) => {
                discard_partial_import(&destination);
                return Err(e);
            }
        };
        self.overlay_tags(&mut song, &destination);

        log::info!("imported {} as {}", source.display(), song.file_name);
        self.songs.insert(0, song.clone());
        self.persist();
        Ok(song)
    }

    /// Technical attributes for a file already inside the audio directory.
    fn create_metadata(
        &self,
        path: &Path,
        date_added: DateTime<Utc>,
    ) -> Result<TrackMetadata, ImportError> {
        let size = fs::metadata(path)
            .map_err(|e| ImportError::ProbeFailed {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let mut song = TrackMetadata::new(file_name, size, date_added);
        if let Some(props) = self.probe.properties(path) {
            song.duration_secs = props.duration_secs.max(0.0);
            song.sample_rate_hz = props.sample_rate_hz;
            song.channel_count = props.channel_count;
        }
        song.bitrate_kbps = derive_bitrate_kbps(song.file_size_bytes, song.duration_secs);
        Ok(song)
    }

    fn overlay_tags(&self, song: &mut TrackMetadata, path: &Path) {
        let Some(tags) = self.probe.tags(path) else {
            return;
        };
        let fields = [
            (tags.title, &mut song.title),
            (tags.artist, &mut song.artist),
            (tags.album, &mut song.album),
            (tags.genre, &mut song.genre),
            (tags.year, &mut song.year),
        ];
        for (value, slot) in fields {
            if !value.is_empty() {
                *slot = value;
            }
        }
    }

    /// Apply the provided fields to song `id`. Unknown ids are ignored.
    pub fn update_metadata(&mut self, id: Uuid, update: MetadataUpdate) {
        let Some(index) = self.position(id) else {
            return;
        };
        update.apply_to(&mut self.songs[index]);
        self.songs[index].date_modified = Utc::now();
        self.persist();
    }

    /// Rename the backing file to `new_base_name` + the song's extension.
    pub fn rename_file(&mut self, id: Uuid, new_base_name: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        match self.move_file(index, new_base_name) {
            Ok(()) => {
                self.persist();
                true
            }
            Err(e) => {
                log::warn!("{e}");
                self.last_error = Some(e.into());
                false
            }
        }
    }

    fn move_file(&mut self, index: usize, new_base_name: &str) -> Result<(), RenameError> {
        if !is_plain_base_name(new_base_name) {
            return Err(RenameError::InvalidName {
                name: new_base_name.to_string(),
            });
        }
        let song = &self.songs[index];
        let new_file_name = if song.file_extension.is_empty() {
            new_base_name.to_string()
        } else {
            format!("{new_base_name}.{}", song.file_extension)
        };
        let from = song.file_path(&self.audio_dir);
        let to = self.audio_dir.join(&new_file_name);

        if to.exists() || self.songs.iter().any(|s| s.file_name == new_file_name) {
            return Err(RenameError::NameConflict {
                file_name: new_file_name,
            });
        }

        fs::rename(&from, &to).map_err(|e| RenameError::IoFailure {
            from: song.file_name.clone(),
            to: new_file_name.clone(),
            source: e,
        })?;

        let song = &mut self.songs[index];
        log::info!("renamed {} to {}", song.file_name, new_file_name);
        song.file_name = new_file_name;
        song.date_modified = Utc::now();
        Ok(())
    }

    /// Remove the backing file and then the entry. A failed file removal
    /// keeps the entry.
    pub fn delete_song(&mut self, id: Uuid) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let song = &self.songs[index];
        if let Err(e) = fs::remove_file(song.file_path(&self.audio_dir)) {
            let err = DeleteError::FileIoFailure {
                file_name: song.file_name.clone(),
                source: e,
            };
            log::warn!("{err}");
            self.last_error = Some(err.into());
            return false;
        }

        let removed = self.songs.remove(index);
        log::info!("deleted {}", removed.file_name);
        self.persist();
        true
    }

    /// Best-effort batch delete; returns how many songs were removed.
    pub fn delete_songs(&mut self, ids: &HashSet<Uuid>) -> usize {
        ids.iter().filter(|&&id| self.delete_song(id)).count()
    }

    pub fn get_song(&self, id: Uuid) -> Option<&TrackMetadata> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn get_song_by_file_name(&self, file_name: &str) -> Option<&TrackMetadata> {
        self.songs.iter().find(|s| s.file_name == file_name)
    }

    /// Songs ordered by `key`. Ties keep insertion order in either direction.
    pub fn sorted_songs(&self, key: SortKey, ascending: bool) -> Vec<TrackMetadata> {
        let mut sorted = self.songs.clone();
        sorted.sort_by(|a, b| {
            let ord = compare_by(key, a, b);
            if ascending { ord } else { ord.reverse() }
        });
        sorted
    }

    /// Case-insensitive substring search over title, artist, album and genre.
    pub fn search_songs(&self, query: &str) -> Vec<TrackMetadata> {
        if query.is_empty() {
            return self.songs.clone();
        }
        let needle = query.to_lowercase();
        self.songs
            .iter()
            .filter(|song| {
                song.display_title().to_lowercase().contains(&needle)
                    || song.display_artist().to_lowercase().contains(&needle)
                    || song.album.to_lowercase().contains(&needle)
                    || song.genre.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn total_duration_secs(&self) -> f64 {
        self.songs.iter().map(|s| s.duration_secs).sum()
    }

    pub fn total_file_size(&self) -> u64 {
        self.songs.iter().map(|s| s.file_size_bytes).sum()
    }

    pub fn total_duration_formatted(&self) -> String {
        format_total_duration(self.total_duration_secs())
    }

    pub fn total_file_size_formatted(&self) -> String {
        format_byte_count(self.total_file_size())
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.songs.iter().position(|s| s.id == id)
    }

    /// Drop entries whose backing file is gone; persist only if something changed.
    fn validate(&mut self) {
        let before = self.songs.len();
        let audio_dir = &self.audio_dir;
        self.songs.retain(|song| {
            let exists = song.file_path(audio_dir).exists();
            if !exists {
                log::info!("dropping {}: backing file is missing", song.file_name);
            }
            exists
        });
        if self.songs.len() != before {
            self.persist();
        }
    }

    /// Adopt supported files in the audio directory that have no entry yet.
    fn migrate_existing_files(&mut self) {
        for path in list_audio_files(&self.audio_dir, &self.extensions) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.songs.iter().any(|s| s.file_name == name) {
                continue;
            }

            let date_added = file_created(&path).unwrap_or_else(Utc::now);
            match self.create_metadata(&path, date_added) {
                Ok(mut song) => {
                    self.overlay_tags(&mut song, &path);
                    log::debug!("adopted {}", song.file_name);
                    self.songs.push(song);
                }
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }

        self.songs.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.document.save(&self.songs) {
            log::warn!("failed to save library: {e}");
            self.last_error = Some(e.into());
        }
    }
}

fn compare_by(key: SortKey, a: &TrackMetadata, b: &TrackMetadata) -> Ordering {
    match key {
        SortKey::DateAdded => a.date_added.cmp(&b.date_added),
        SortKey::Title => caseless_cmp(&a.display_title(), &b.display_title()),
        SortKey::Artist => caseless_cmp(a.display_artist(), b.display_artist()),
        SortKey::Album => caseless_cmp(&a.album, &b.album),
        SortKey::Duration => a.duration_secs.total_cmp(&b.duration_secs),
        SortKey::FileSize => a.file_size_bytes.cmp(&b.file_size_bytes),
    }
}

/// Remove a copy whose metadata could not be built. A failure leaves an
/// orphan in the audio directory, so it is logged with its path.
pub(super) fn discard_partial_import(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not remove partial import {}: {e}", path.display());
            false
        }
    }
}

/// A single visible path component: no separators, not empty, no leading dot.
fn is_plain_base_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn file_created(path: &Path) -> Option<DateTime<Utc>> {
    let meta = fs::metadata(path).ok()?;
    meta.created().or_else(|_| meta.modified()).ok().map(DateTime::<Utc>::from)
}

/// `dir/file_name`, or `dir/stem (n).ext` with the smallest free `n`.
pub(super) fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = path.extension().and_then(|e| e.to_str());

    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
