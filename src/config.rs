//! Settings for the library location, playback polling and the sleep timer.
//!
//! Values come from struct defaults, then an optional TOML file, then
//! `TONEARM__`-prefixed environment variables.

mod load;
mod schema;

pub use load::{default_config_path, default_data_dir, resolve_config_path};
pub use schema::*;
