//! Encoding of the persisted goal record.
//!
//! The record is one JSON object. `loggedDays` is itself an embedded JSON
//! document (stored as a string) and the activity timestamps are epoch
//! seconds, present only when set:
//!
//! ```json
//! {
//!   "goal": "Rust",
//!   "duration": "Week",
//!   "startDate": "2025-05-01T09:00:00Z",
//!   "endDate": "2025-05-08T09:00:00Z",
//!   "learnedStreak": 1,
//!   "freezesLeft": 2,
//!   "totalFreezes": 2,
//!   "loggedDays": "{\"2025-05-01\":\"learned\"}",
//!   "isGoalActive": true,
//!   "lastLearnedDate": 1746090000.0
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::goal::{DayStatus, GoalDuration, GoalState};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalRecord {
    goal: String,
    duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<DateTime<Utc>>,
    learned_streak: u32,
    freezes_left: u32,
    total_freezes: u32,
    logged_days: String,
    is_goal_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_learned_date: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_frozen_date: Option<f64>,
}

/// Encode a state into the persisted blob.
pub fn encode(state: &GoalState) -> Result<String, PersistenceError> {
    let logged_days = serde_json::to_string(&state.logged_days)
        .map_err(|e| PersistenceError::Encode(e.to_string()))?;

    let record = GoalRecord {
        goal: state.goal.clone(),
        duration: state.duration.as_str().to_string(),
        start_date: state.start_date,
        end_date: state.end_date,
        learned_streak: state.learned_streak,
        freezes_left: state.freezes_left,
        total_freezes: state.total_freezes,
        logged_days,
        is_goal_active: state.is_goal_active,
        last_learned_date: state.last_learned_at.map(to_epoch_secs),
        last_frozen_date: state.last_frozen_at.map(to_epoch_secs),
    };

    serde_json::to_string(&record).map_err(|e| PersistenceError::Encode(e.to_string()))
}

/// Decode a persisted blob.
///
/// Missing fields take their defaults and an unknown duration loads as
/// `Week`. An inactive record always decodes to the empty state.
pub fn decode(blob: &str) -> Result<GoalState, PersistenceError> {
    let record: GoalRecord =
        serde_json::from_str(blob).map_err(|e| PersistenceError::Decode(e.to_string()))?;

    if !record.is_goal_active {
        return Ok(GoalState::default());
    }

    let logged_days: BTreeMap<String, DayStatus> = if record.logged_days.is_empty() {
        BTreeMap::new()
    } else {
        serde_json::from_str(&record.logged_days)
            .map_err(|e| PersistenceError::Decode(format!("loggedDays: {e}")))?
    };

    let last_learned_at = record
        .last_learned_date
        .map(from_epoch_secs)
        .transpose()?;
    let last_frozen_at = record.last_frozen_date.map(from_epoch_secs).transpose()?;

    Ok(GoalState {
        goal: record.goal,
        duration: record.duration.parse().unwrap_or(GoalDuration::Week),
        start_date: record.start_date,
        end_date: record.end_date,
        learned_streak: record.learned_streak,
        freezes_left: record.freezes_left.min(record.total_freezes),
        total_freezes: record.total_freezes,
        logged_days,
        is_goal_active: true,
        last_learned_at,
        last_frozen_at,
    })
}

/// Epoch seconds with microsecond resolution.
fn to_epoch_secs(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

fn from_epoch_secs(secs: f64) -> Result<DateTime<Utc>, PersistenceError> {
    if !secs.is_finite() {
        return Err(PersistenceError::Decode(format!("invalid timestamp: {secs}")));
    }
    let micros = (secs * 1_000_000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| PersistenceError::Decode(format!("timestamp out of range: {secs}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_state() -> GoalState {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let mut logged_days = BTreeMap::new();
        logged_days.insert("2025-05-01".to_string(), DayStatus::Learned);
        logged_days.insert("2025-05-02".to_string(), DayStatus::Frozen);
        GoalState {
            goal: "Rust".into(),
            duration: GoalDuration::Month,
            start_date: Some(start),
            end_date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
            learned_streak: 1,
            freezes_left: 7,
            total_freezes: 8,
            logged_days,
            is_goal_active: true,
            last_learned_at: Some(start + chrono::Duration::microseconds(123_456)),
            last_frozen_at: Some(Utc.with_ymd_and_hms(2025, 5, 2, 20, 15, 1).unwrap()),
        }
    }

    #[test]
    fn roundtrip_reproduces_every_field() {
        let state = sample_state();
        let decoded = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn absent_activity_is_omitted_not_zero() {
        let mut state = sample_state();
        state.last_learned_at = None;
        state.last_frozen_at = None;
        let blob = encode(&state).unwrap();
        let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert!(json.get("lastLearnedDate").is_none());
        assert!(json.get("lastFrozenDate").is_none());
        assert_eq!(decode(&blob).unwrap().last_learned_at, None);
    }

    #[test]
    fn field_names_and_embedded_log() {
        let blob = encode(&sample_state()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(json["duration"], "Month");
        assert_eq!(json["isGoalActive"], true);
        assert_eq!(json["totalFreezes"], 8);
        let embedded = json["loggedDays"].as_str().unwrap();
        let days: serde_json::Value = serde_json::from_str(embedded).unwrap();
        assert_eq!(days["2025-05-02"], "frozen");
    }

    #[test]
    fn unknown_duration_loads_as_week() {
        let blob = r#"{"goal":"Go","duration":"Decade","isGoalActive":true,"totalFreezes":2,"freezesLeft":2}"#;
        let state = decode(blob).unwrap();
        assert_eq!(state.duration, GoalDuration::Week);
        assert_eq!(state.goal, "Go");
        assert!(state.logged_days.is_empty());
    }

    #[test]
    fn inactive_record_decodes_to_defaults() {
        let blob = r#"{"goal":"stale","learnedStreak":4,"isGoalActive":false}"#;
        assert!(decode(blob).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode("not json"), Err(PersistenceError::Decode(_))));
        let bad_days = r#"{"isGoalActive":true,"loggedDays":"[1,2]"}"#;
        assert!(matches!(decode(bad_days), Err(PersistenceError::Decode(_))));
    }
}
