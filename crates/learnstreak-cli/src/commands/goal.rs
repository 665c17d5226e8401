use chrono::{DateTime, Utc};
use clap::Subcommand;
use learnstreak_core::GoalDuration;

use super::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Start a new goal, replacing any current one
    Start {
        /// Goal name (empty uses the configured default)
        #[arg(default_value = "")]
        name: String,
        /// Goal length: week, month or year
        #[arg(long, short, default_value = "week")]
        duration: GoalDuration,
    },
    /// Re-select the goal; the current streak and log history are dropped
    Update {
        /// Goal name (empty uses the configured default)
        #[arg(default_value = "")]
        name: String,
        /// Goal length: week, month or year
        #[arg(long, short, default_value = "week")]
        duration: GoalDuration,
    },
    /// Clear the goal and delete the saved record
    Reset,
    /// Print the current goal as JSON
    Status,
}

pub fn run(action: GoalAction, now: DateTime<Utc>) -> CliResult {
    let mut engine = open_engine(now)?;

    match action {
        GoalAction::Start { name, duration } => {
            if let Some(event) = engine.start_goal(&name, duration, now)? {
                print_json(&event)?;
            }
        }
        GoalAction::Update { name, duration } => {
            if let Some(event) = engine.update_goal(&name, duration, now)? {
                print_json(&event)?;
            }
        }
        GoalAction::Reset => match engine.reset_goal(now)? {
            Some(event) => print_json(&event)?,
            None => println!("{{\"type\": \"no_goal\"}}"),
        },
        GoalAction::Status => print_json(&engine.snapshot(now))?,
    }
    Ok(())
}
