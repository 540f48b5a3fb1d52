use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Whether `path` has one of `extensions` (case-insensitive, leading dot optional).
pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List supported, non-hidden files directly inside `dir`.
///
/// The managed audio directory is flat, so this never recurses. A missing
/// directory yields an empty list.
pub fn list_audio_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && !is_hidden(path) && is_audio_file(path, extensions))
        .collect();
    files.sort();
    files
}
