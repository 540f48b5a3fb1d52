use clap::Parser;

mod cli;
mod commands;
mod event_loop;
mod settings;
mod startup;

pub use cli::{Cli, Command, EditFields, PlayArgs, RepeatArg, SortArg};
pub use event_loop::{Repeating, run_session};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = settings::load_settings();
    let paths = startup::Paths::from_settings(&settings)?;

    // Opening the library validates it against disk, so only do it when needed.
    let library = || startup::open_library(&settings, &paths);

    match cli.command {
        Command::Import { files } => commands::import(&mut library(), &files),
        Command::List { sort, descending } => commands::list(&library(), sort.into(), descending),
        Command::Search { query } => commands::search(&library(), &query),
        Command::Show { song } => commands::show(&library(), &song),
        Command::Edit { song, fields } => commands::edit(&mut library(), &song, fields.into()),
        Command::Rename { song, new_name } => commands::rename(&mut library(), &song, &new_name),
        Command::Delete { songs } => commands::delete(&mut library(), &songs),
        Command::Stats => commands::stats(&library()),
        Command::Presets { delete } => {
            let mut effects = startup::open_effects(&paths);
            commands::presets(&mut effects, delete.as_deref())
        }
        Command::Play(args) => commands::play(&settings, &paths, &library(), args),
    }
}
