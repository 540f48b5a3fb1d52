use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::audio::RepeatMode;
use crate::library::{MetadataUpdate, SortKey};

/// Manage a music library and play tracks from it.
#[derive(Parser, Debug)]
#[command(name = "tonearm", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy audio files into the library
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List library entries
    List {
        #[arg(long, value_enum, default_value_t = SortArg::DateAdded)]
        sort: SortArg,
        #[arg(long)]
        descending: bool,
    },
    /// Find entries whose title, artist, album or genre contain QUERY
    Search { query: String },
    /// Print every field of one entry
    Show { song: String },
    /// Change descriptive metadata of one entry
    Edit {
        song: String,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Rename the file behind an entry
    Rename { song: String, new_name: String },
    /// Remove entries and their files
    Delete {
        #[arg(required = true)]
        songs: Vec<String>,
    },
    /// Library totals
    Stats,
    /// List equalizer presets
    Presets {
        /// Delete the named custom preset
        #[arg(long, value_name = "NAME")]
        delete: Option<String>,
    },
    /// Play one track until it ends or the sleep timer fires
    Play(PlayArgs),
}

#[derive(Args, Debug, Default)]
pub struct EditFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub artist: Option<String>,
    #[arg(long)]
    pub album: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
}

impl From<EditFields> for MetadataUpdate {
    fn from(fields: EditFields) -> Self {
        Self {
            title: fields.title,
            artist: fields.artist,
            album: fields.album,
            genre: fields.genre,
            year: fields.year,
            comments: fields.comments,
        }
    }
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Library id, managed file name, or a path to any audio file
    pub song: String,
    #[arg(long, value_enum)]
    pub repeat: Option<RepeatArg>,
    /// Pause after this many seconds
    #[arg(long, value_name = "SECS")]
    pub sleep: Option<u64>,
    /// Do not fade out before the sleep timer fires
    #[arg(long)]
    pub no_fade: bool,
    /// Built-in equalizer preset
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,
    /// Saved custom equalizer preset
    #[arg(long, value_name = "NAME")]
    pub custom_preset: Option<String>,
    /// Band gains in dB, comma separated, lowest band first
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub eq: Vec<f32>,
    #[arg(long)]
    pub bass: Option<f32>,
    #[arg(long)]
    pub treble: Option<f32>,
    #[arg(long)]
    pub reverb: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub balance: Option<f32>,
    /// Save the resulting bands as a custom preset
    #[arg(long, value_name = "NAME")]
    pub save_preset: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    DateAdded,
    Title,
    Artist,
    Album,
    Duration,
    FileSize,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::DateAdded => SortKey::DateAdded,
            SortArg::Title => SortKey::Title,
            SortArg::Artist => SortKey::Artist,
            SortArg::Album => SortKey::Album,
            SortArg::Duration => SortKey::Duration,
            SortArg::FileSize => SortKey::FileSize,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatArg {
    Off,
    One,
    All,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::One => RepeatMode::One,
            RepeatArg::All => RepeatMode::All,
        }
    }
}
