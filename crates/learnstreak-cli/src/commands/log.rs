use chrono::{DateTime, Utc};
use clap::Subcommand;
use learnstreak_core::DayStatus;

use super::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum LogAction {
    /// Mark today as learned and extend the streak
    Learned,
    /// Spend a freeze on today
    Frozen,
}

impl From<LogAction> for DayStatus {
    fn from(action: LogAction) -> Self {
        match action {
            LogAction::Learned => DayStatus::Learned,
            LogAction::Frozen => DayStatus::Frozen,
        }
    }
}

pub fn run(action: LogAction, now: DateTime<Utc>) -> CliResult {
    let mut engine = open_engine(now)?;

    match engine.log_day(action.into(), now)? {
        Some(event) => print_json(&event),
        // Ignored logs leave state unchanged; show it so the caller can see why.
        None => print_json(&engine.snapshot(now)),
    }
}
