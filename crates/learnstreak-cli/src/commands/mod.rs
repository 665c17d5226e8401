pub mod calendar;
pub mod completions;
pub mod config;
pub mod goal;
pub mod log;
pub mod streak;
pub mod watch;

use chrono::{DateTime, Local, Utc};
use learnstreak_core::{Config, Database, GoalEngine};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the engine over the on-disk database in the local time zone.
pub fn open_engine(now: DateTime<Utc>) -> Result<GoalEngine<Database>, Box<dyn std::error::Error>> {
    let mut engine = hydrate_engine()?;
    engine.enforce_streak_rule(now)?;
    Ok(engine)
}

/// Like [`open_engine`] but leaves the streak rule to the caller.
pub fn hydrate_engine() -> Result<GoalEngine<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    Ok(GoalEngine::hydrate(db, Local, config.engine_config())?)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
