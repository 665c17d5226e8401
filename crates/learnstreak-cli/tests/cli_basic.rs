//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory
//! and pins the clock with `--at` so date keys are deterministic.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

struct Cli {
    home: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_learnstreak"))
            .args(args)
            .env("LEARNSTREAK_HOME", self.home.path())
            .env("TZ", "UTC")
            .env_remove("LEARNSTREAK_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn json(&self, args: &[&str]) -> Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "command {args:?} failed: {stderr}");
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }
}

const DAY0: &str = "2025-06-02T09:00:00Z";
const DAY1: &str = "2025-06-03T09:00:00Z";
const DAY9: &str = "2025-06-11T09:00:00Z";

#[test]
fn test_goal_start_and_status() {
    let cli = Cli::new();
    let started = cli.json(&["goal", "start", "Rust", "--duration", "week", "--at", DAY0]);
    assert_eq!(started["type"], "goal_started");
    assert_eq!(started["goal"], "Rust");
    assert_eq!(started["total_freezes"], 2);

    let status = cli.json(&["goal", "status", "--at", DAY0]);
    assert_eq!(status["goal"], "Rust");
    assert_eq!(status["phase"], "active");
    assert_eq!(status["freezes_left"], 2);
    assert_eq!(status["is_today_logged"], false);
}

#[test]
fn test_week_scenario() {
    let cli = Cli::new();
    cli.json(&["goal", "start", "Rust", "--at", DAY0]);

    let logged = cli.json(&["log", "learned", "--at", DAY0]);
    assert_eq!(logged["type"], "day_logged");
    assert_eq!(logged["learned_streak"], 1);

    // Second log on the same day prints the unchanged snapshot.
    let again = cli.json(&["log", "frozen", "--at", DAY0]);
    assert!(again.get("type").is_none());
    assert_eq!(again["learned_streak"], 1);
    assert_eq!(again["freezes_left"], 2);

    let frozen = cli.json(&["log", "frozen", "--at", DAY1]);
    assert_eq!(frozen["freezes_left"], 1);
    assert_eq!(frozen["learned_streak"], 1);

    let late = cli.json(&["log", "learned", "--at", DAY9]);
    assert_eq!(late["phase"], "complete");
    assert_eq!(late["is_today_logged"], false);
}

#[test]
fn test_streak_check_resets_after_inactivity() {
    let cli = Cli::new();
    cli.json(&["goal", "start", "Rust", "--duration", "month", "--at", DAY0]);
    cli.json(&["log", "learned", "--at", DAY0]);

    let fresh = cli.json(&["streak", "check", "--at", "2025-06-03T17:00:00Z"]);
    assert_eq!(fresh["learned_streak"], 1);
    assert!(fresh["reset"].is_null());
    assert_eq!(fresh["window_hours"], 32);

    let stale = cli.json(&["streak", "check", "--at", "2025-06-03T17:00:01Z"]);
    assert_eq!(stale["learned_streak"], 0);
    assert_eq!(stale["reset"]["type"], "streak_reset");
    assert_eq!(stale["reset"]["streak_before"], 1);
}

#[test]
fn test_goal_reset() {
    let cli = Cli::new();
    cli.json(&["goal", "start", "--at", DAY0]);
    let cleared = cli.json(&["goal", "reset"]);
    assert_eq!(cleared["type"], "goal_cleared");

    let status = cli.json(&["goal", "status", "--at", DAY0]);
    assert_eq!(status["phase"], "no_goal");
    assert_eq!(status["goal"], "");

    let again = cli.json(&["goal", "reset"]);
    assert_eq!(again["type"], "no_goal");
}

#[test]
fn test_goal_reset_uses_at_time() {
    let cli = Cli::new();
    cli.json(&["goal", "start", "--at", DAY0]);
    let cleared = cli.json(&["goal", "reset", "--at", DAY1]);
    assert_eq!(cleared["type"], "goal_cleared");
    assert_eq!(cleared["at"], DAY1);
}

#[test]
fn test_calendar_views() {
    let cli = Cli::new();
    cli.json(&["goal", "start", "--at", DAY0]);
    cli.json(&["log", "learned", "--at", DAY0]);

    // 2025-06-02 is a Monday; weeks start on Sunday by default.
    let week = cli.json(&["calendar", "week", "--at", DAY0]);
    let days = week.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2025-06-01");
    assert_eq!(days[1]["status"], "learned");

    let next = cli.json(&["calendar", "week", "--offset", "-1", "--at", DAY0]);
    assert_eq!(next[0]["date"], "2025-05-25");

    let month = cli.json(&["calendar", "month", "--month", "2025-02", "--at", DAY0]);
    assert_eq!(month["month"], "2025-02");
    assert_eq!(month["weekdays"][0], "Sun");
    let weeks = month["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[0][6]["date"], "2025-02-01");
    assert_eq!(weeks[0][0]["in_month"], false);

    let months = cli.json(&["calendar", "months", "--at", DAY0]);
    assert_eq!(months, serde_json::json!(["2025-05", "2025-06", "2025-07"]));
}

#[test]
fn test_config_roundtrip() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "get", "streak.inactivity_hours"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "32");

    let (stdout, _, code) = cli.run(&["config", "set", "calendar.first_weekday", "monday"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "calendar.first_weekday = Mon");
    let week = cli.json(&["calendar", "week", "--at", DAY0]);
    assert_eq!(week[0]["date"], "2025-06-02");

    let (_, stderr, code) = cli.run(&["config", "set", "streak.inactivity_hours", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, _, code) = cli.run(&["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    let list = cli.json(&["config", "list"]);
    assert_eq!(list["goal"]["default_name"], "Swift");
    assert_eq!(list["calendar"]["first_weekday"], "Mon");
}

#[test]
fn test_config_unset_and_path() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim(),
        cli.home.path().join("config.toml").display().to_string()
    );

    cli.run(&["config", "set", "goal.default_name", "Rust"]);
    cli.run(&["config", "set", "streak.inactivity_hours", "48"]);
    let (stdout, _, code) = cli.run(&["config", "unset", "goal.default_name"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "goal.default_name = Swift");

    let list = cli.json(&["config", "list"]);
    assert_eq!(list["goal"]["default_name"], "Swift");
    assert_eq!(list["streak"]["inactivity_hours"], 48);

    let (_, _, code) = cli.run(&["config", "unset", "goal.color"]);
    assert_eq!(code, 1);

    let (stdout, _, code) = cli.run(&["config", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("restored defaults in "));
    assert_eq!(cli.json(&["config", "list"])["streak"]["inactivity_hours"], 32);
}

#[test]
fn test_invalid_input_fails() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["goal", "start", "--duration", "decade"]);
    assert_ne!(code, 0);

    let (_, stderr, code) = cli.run(&["calendar", "month", "--month", "June"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid month"));
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("learnstreak"));
}
