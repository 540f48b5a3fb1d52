use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use uuid::Uuid;

use crate::audio::{Engine, RodioEngine};
use crate::config::Settings;
use crate::effects::{EffectsState, builtin_preset_names};
use crate::library::{LibraryStore, MetadataUpdate, SortKey, TrackMetadata};
use crate::session::PlaybackSession;

use super::cli::PlayArgs;
use super::event_loop::run_session;
use super::startup::{self, Paths};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Look a song up by id, then by managed file name.
pub fn find_song<'a>(library: &'a LibraryStore, key: &str) -> Option<&'a TrackMetadata> {
    Uuid::parse_str(key)
        .ok()
        .and_then(|id| library.get_song(id))
        .or_else(|| library.get_song_by_file_name(key))
}

fn require_song<'a>(
    library: &'a LibraryStore,
    key: &str,
) -> Result<&'a TrackMetadata, Box<dyn std::error::Error>> {
    find_song(library, key).ok_or_else(|| format!("no song matches '{key}'").into())
}

pub fn summary_line(song: &TrackMetadata) -> String {
    format!(
        "{}  {} - {}  [{}]  {}",
        song.id,
        song.display_title(),
        song.display_artist(),
        song.duration_formatted(),
        song.file_size_formatted()
    )
}

fn print_songs(songs: &[TrackMetadata]) {
    for song in songs {
        println!("{}", summary_line(song));
    }
}

pub fn import(library: &mut LibraryStore, files: &[std::path::PathBuf]) -> CommandResult {
    library.clear_error();
    let imported = library.import_files(files);
    print_songs(&imported);
    println!("imported {} of {} files", imported.len(), files.len());
    if let Some(e) = library.last_error() {
        log::warn!("last import failure: {e}");
    }
    Ok(())
}

pub fn list(library: &LibraryStore, sort: SortKey, descending: bool) -> CommandResult {
    print_songs(&library.sorted_songs(sort, !descending));
    Ok(())
}

pub fn search(library: &LibraryStore, query: &str) -> CommandResult {
    print_songs(&library.search_songs(query));
    Ok(())
}

pub fn show(library: &LibraryStore, key: &str) -> CommandResult {
    let song = require_song(library, key)?;
    let rows = [
        ("id", song.id.to_string()),
        ("file", song.file_name.clone()),
        ("title", song.display_title()),
        ("artist", song.display_artist().to_string()),
        ("album", song.album.clone()),
        ("genre", song.genre.clone()),
        ("year", song.year.clone()),
        ("comments", song.comments.clone()),
        ("duration", song.duration_formatted()),
        ("size", song.file_size_formatted()),
        ("bitrate", song.bitrate_formatted()),
        ("format", song.format_description()),
        ("added", song.date_added.to_rfc3339()),
        ("modified", song.date_modified.to_rfc3339()),
    ];
    for (label, value) in rows {
        println!("{label:>9}: {value}");
    }
    Ok(())
}

pub fn edit(library: &mut LibraryStore, key: &str, update: MetadataUpdate) -> CommandResult {
    if update.is_empty() {
        return Err("nothing to change; pass at least one field".into());
    }
    let id = require_song(library, key)?.id;
    library.clear_error();
    library.update_metadata(id, update);
    if let Some(e) = library.last_error() {
        return Err(e.to_string().into());
    }
    Ok(())
}

pub fn rename(library: &mut LibraryStore, key: &str, new_name: &str) -> CommandResult {
    let id = require_song(library, key)?.id;
    library.clear_error();
    if !library.rename_file(id, new_name) {
        let reason = library
            .last_error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "rename failed".to_string());
        return Err(reason.into());
    }
    if let Some(song) = library.get_song(id) {
        println!("renamed to {}", song.file_name);
    }
    Ok(())
}

pub fn delete(library: &mut LibraryStore, keys: &[String]) -> CommandResult {
    let mut ids = HashSet::new();
    for key in keys {
        match find_song(library, key) {
            Some(song) => {
                ids.insert(song.id);
            }
            None => log::warn!("no song matches '{key}'"),
        }
    }
    library.clear_error();
    let deleted = library.delete_songs(&ids);
    println!("deleted {deleted} of {} songs", keys.len());
    if let Some(e) = library.last_error() {
        log::warn!("last delete failure: {e}");
    }
    Ok(())
}

pub fn stats(library: &LibraryStore) -> CommandResult {
    println!("songs:    {}", library.song_count());
    println!("duration: {}", library.total_duration_formatted());
    println!("size:     {}", library.total_file_size_formatted());
    Ok(())
}

pub fn presets(effects: &mut EffectsState, delete: Option<&str>) -> CommandResult {
    if let Some(name) = delete {
        if !effects.delete_custom_preset(name)? {
            return Err(format!("no custom preset named '{name}'").into());
        }
        println!("deleted custom preset {name}");
        return Ok(());
    }

    println!("built-in:");
    for name in builtin_preset_names() {
        println!("  {name}");
    }
    println!("custom:");
    for (name, bands) in effects.custom_presets() {
        let gains: Vec<String> = bands.iter().map(|g| format!("{g:+.1}")).collect();
        println!("  {name}  [{}]", gains.join(", "));
    }
    Ok(())
}

pub fn play(settings: &Settings, paths: &Paths, library: &LibraryStore, args: PlayArgs) -> CommandResult {
    let engine = RodioEngine::new()?;
    let mut session = PlaybackSession::new(engine, startup::open_effects(paths))
        .with_sleep_timer(startup::sleep_timer(settings));

    prepare_session(&mut session, library, &args)?;
    session.set_repeat_mode(
        args.repeat
            .map(Into::into)
            .unwrap_or_else(|| settings.playback.repeat_mode.into()),
    );

    if !session.play() {
        return Err("playback could not start".into());
    }
    if let Some(secs) = args.sleep {
        let fade_out = settings.sleep_timer.fade_out && !args.no_fade;
        session.start_sleep_timer(Duration::from_secs(secs), fade_out);
    }

    println!(
        "playing {} - {} [{}] repeat {}",
        session.title().unwrap_or_default(),
        session.artist().unwrap_or("Unknown Artist"),
        session.duration_formatted(),
        session.repeat_mode().label()
    );

    run_session(
        &mut session,
        Duration::from_millis(settings.playback.poll_interval_ms),
        Duration::from_millis(settings.sleep_timer.tick_ms),
    );
    Ok(())
}

/// Load the requested track and apply the effect options in `args`.
pub fn prepare_session<E: Engine>(
    session: &mut PlaybackSession<E>,
    library: &LibraryStore,
    args: &PlayArgs,
) -> CommandResult {
    let loaded = match find_song(library, &args.song) {
        Some(song) => session.load_song(library, song.id),
        None => {
            let path = Path::new(&args.song);
            if !path.is_file() {
                return Err(format!("'{}' is neither a library entry nor a file", args.song).into());
            }
            session.load(path, None, None)
        }
    };
    if !loaded {
        let reason = session
            .last_error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "load failed".to_string());
        return Err(reason.into());
    }

    let mut effects = session.effects_mut();
    if let Some(name) = &args.preset {
        if !effects.apply_preset(name)? {
            return Err(format!("unknown preset '{name}'").into());
        }
    }
    if let Some(name) = &args.custom_preset {
        if !effects.apply_custom_preset(name)? {
            return Err(format!("unknown custom preset '{name}'").into());
        }
    }
    if !args.eq.is_empty() {
        effects.set_eq_bands(&args.eq)?;
    }
    if let Some(v) = args.bass {
        effects.set_bass_boost(v)?;
    }
    if let Some(v) = args.treble {
        effects.set_treble(v)?;
    }
    if let Some(v) = args.reverb {
        effects.set_reverb(v)?;
    }
    if let Some(v) = args.balance {
        effects.set_balance(v)?;
    }
    if let Some(name) = &args.save_preset {
        effects.save_custom_preset(name)?;
    }
    Ok(())
}
