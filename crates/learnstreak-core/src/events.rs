use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::goal::{DayStatus, GoalDuration, StreakResetReason};

/// Every applied state change in the engine produces an Event.
/// Subscribers receive it after the change has been persisted; no-ops
/// produce nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    GoalStarted {
        goal: String,
        duration: GoalDuration,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        total_freezes: u32,
        at: DateTime<Utc>,
    },
    /// The goal was re-selected. Same effect as a fresh start: the previous
    /// streak and log history are gone.
    GoalUpdated {
        goal: String,
        duration: GoalDuration,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        total_freezes: u32,
        at: DateTime<Utc>,
    },
    DayLogged {
        date_key: String,
        status: DayStatus,
        learned_streak: u32,
        freezes_left: u32,
        at: DateTime<Utc>,
    },
    StreakReset {
        streak_before: u32,
        reason: StreakResetReason,
        at: DateTime<Utc>,
    },
    GoalCleared {
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::GoalStarted { at, .. }
            | Event::GoalUpdated { at, .. }
            | Event::DayLogged { at, .. }
            | Event::StreakReset { at, .. }
            | Event::GoalCleared { at } => *at,
        }
    }

    /// Short machine-readable name, matches the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::GoalStarted { .. } => "goal_started",
            Event::GoalUpdated { .. } => "goal_updated",
            Event::DayLogged { .. } => "day_logged",
            Event::StreakReset { .. } => "streak_reset",
            Event::GoalCleared { .. } => "goal_cleared",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kind_matches_serialized_tag() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let event = Event::DayLogged {
            date_key: "2025-01-01".into(),
            status: DayStatus::Learned,
            learned_streak: 1,
            freezes_left: 2,
            at,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["status"], "learned");
        assert_eq!(event.at(), at);
    }
}
