use std::sync::{Arc, Mutex};

use chrono::Utc;
use learnstreak_core::{Config, LogDaySession};

use super::{hydrate_engine, print_json, CliResult};

/// Keep a log-day session open until Ctrl-C, printing every event as a JSON
/// line. Stale streaks are reset at startup and at each local midnight.
pub fn run() -> CliResult {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch())
}

async fn watch() -> CliResult {
    let config = Config::load_or_default();
    let mut engine = hydrate_engine()?;
    engine.subscribe(|event, _| match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(err) => tracing::warn!(error = %err, "failed to encode event"),
    });

    let now = Utc::now();
    engine.enforce_streak_rule(now)?;
    print_json(&engine.snapshot(now))?;

    let engine = Arc::new(Mutex::new(engine));
    let mut session = LogDaySession::new(engine, config.calendar.first_weekday, now)?;
    if !session.on_appear()? {
        return Err("midnight timer could not be armed".into());
    }
    tracing::info!("watching for midnight, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    session.on_disappear();
    Ok(())
}
