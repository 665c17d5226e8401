use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::json;

use super::{hydrate_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Apply the inactivity rule and print the outcome
    Check,
}

pub fn run(action: StreakAction, now: DateTime<Utc>) -> CliResult {
    match action {
        StreakAction::Check => {
            let mut engine = hydrate_engine()?;
            let reset = engine.enforce_streak_rule(now)?;
            print_json(&json!({
                "learned_streak": engine.learned_streak(),
                "deadline": engine.streak_rule().deadline(engine.state()),
                "window_hours": engine.streak_rule().window().num_hours(),
                "reset": reset,
            }))
        }
    }
}
