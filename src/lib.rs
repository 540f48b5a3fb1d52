//! Playback session controller and file-backed music library.
//!
//! The [`library`] owns imported files and their metadata, the [`session`]
//! drives one [`audio::Engine`] through its state machine, and [`effects`]
//! keeps equalizer state in step with the engine.

pub mod audio;
pub mod config;
pub mod effects;
pub mod error;
pub mod library;
pub mod persist;
pub mod runtime;
pub mod session;
