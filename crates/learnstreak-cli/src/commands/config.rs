use clap::Subcommand;
use learnstreak_core::Config;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key: goal.default_name, streak.inactivity_hours,
        /// calendar.first_weekday, calendar.months_before, calendar.months_after
        key: String,
    },
    /// Change one setting and save it
    Set {
        /// Dotted key, as for `get`
        key: String,
        /// New value; weekdays are written Mon..Sun, the inactivity window in hours
        value: String,
    },
    /// Put one setting back to its default
    Unset {
        /// Dotted key, as for `get`
        key: String,
    },
    /// Print every setting as JSON
    List,
    /// Print where the config file lives
    Path,
    /// Overwrite the config file with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            // Echo the stored form, e.g. "monday" comes back as "Mon".
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load()?;
            let restored = config.restore_default(&key)?;
            config.save()?;
            println!("{key} = {restored}");
        }
        ConfigAction::List => print_json(&Config::load()?)?,
        ConfigAction::Path => println!("{}", Config::file_path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("restored defaults in {}", Config::file_path()?.display());
        }
    }
    Ok(())
}
