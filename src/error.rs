//! Error taxonomy shared by the library store, the persistence layer and the
//! engine boundary.
//!
//! Core operations surface these as `Result`s internally; the public library
//! API flattens most of them into `bool`/`Option` returns plus a "last error"
//! slot (see [`crate::library::LibraryStore::last_error`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot access '{path}': {source}")]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy '{path}' into the library: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read audio file information for '{path}': {source}")]
    ProbeFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum RenameError {
    #[error("'{name}' is not a valid file name")]
    InvalidName { name: String },
    #[error("a file named '{file_name}' already exists")]
    NameConflict { file_name: String },
    #[error("failed to rename '{from}' to '{to}': {source}")]
    IoFailure {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("failed to delete '{file_name}': {source}")]
    FileIoFailure {
        file_name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to encode '{path}': {source}")]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode '{path}': {source}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything the library store can record in its "last error" slot.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("failed to import file: {0}")]
    Import(#[from] ImportError),
    #[error("failed to rename file: {0}")]
    Rename(#[from] RenameError),
    #[error("failed to delete file: {0}")]
    Delete(#[from] DeleteError),
    #[error("failed to persist library: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to load '{path}': {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("engine rejected {parameter}: {reason}")]
    Rejected {
        parameter: &'static str,
        reason: String,
    },
}
