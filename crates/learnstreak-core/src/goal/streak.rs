//! Inactivity-based streak reset.
//!
//! A streak survives as long as the user learns or freezes at least once per
//! inactivity window (32 hours by default). The window is measured from the
//! most recent activity of either kind, so a freeze keeps a streak alive
//! without extending it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::model::GoalState;

/// Default inactivity window: 32 hours.
pub const DEFAULT_INACTIVITY_WINDOW_SECS: i64 = 32 * 60 * 60;

/// Why a streak was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreakResetReason {
    /// Positive streak with no recorded activity (inconsistent state).
    NoRecordedActivity,
    /// Longer than the window since the last learn or freeze.
    Inactive { idle_secs: i64 },
}

impl StreakResetReason {
    /// Human-readable description of the reset
    pub fn description(&self) -> String {
        match self {
            StreakResetReason::NoRecordedActivity => {
                "Streak had no recorded activity".to_string()
            }
            StreakResetReason::Inactive { idle_secs } => {
                let hours = idle_secs / 3600;
                format!("No learning or freeze for {hours} hours")
            }
        }
    }
}

/// Configuration for the inactivity rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRuleConfig {
    /// Allowed gap between activities (seconds). A gap equal to the window is
    /// still allowed; only a strictly longer gap resets.
    pub inactivity_window_secs: i64,
}

impl Default for StreakRuleConfig {
    fn default() -> Self {
        Self {
            inactivity_window_secs: DEFAULT_INACTIVITY_WINDOW_SECS,
        }
    }
}

/// A streak reset decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResetEvent {
    pub streak_before: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub reason: StreakResetReason,
    pub at: DateTime<Utc>,
}

/// Decides whether an active streak must be reset.
#[derive(Debug, Clone, Default)]
pub struct StreakRule {
    config: StreakRuleConfig,
}

impl StreakRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StreakRuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StreakRuleConfig {
        &self.config
    }

    pub fn window(&self) -> Duration {
        Duration::seconds(self.config.inactivity_window_secs)
    }

    /// Evaluate the rule at `now`.
    ///
    /// Returns `None` when there is nothing to do: no active goal, a zero
    /// streak, or recent enough activity.
    pub fn evaluate(&self, state: &GoalState, now: DateTime<Utc>) -> Option<StreakResetEvent> {
        if !state.is_goal_active || state.learned_streak == 0 {
            return None;
        }

        let last_activity = state.last_activity();
        let reason = match last_activity {
            None => StreakResetReason::NoRecordedActivity,
            Some(last) => {
                let idle = now.signed_duration_since(last);
                if idle <= self.window() {
                    return None;
                }
                StreakResetReason::Inactive {
                    idle_secs: idle.num_seconds(),
                }
            }
        };

        Some(StreakResetEvent {
            streak_before: state.learned_streak,
            last_activity,
            reason,
            at: now,
        })
    }

    /// Instant after which the current streak will be reset if nothing is
    /// logged. `None` when the rule cannot fire.
    pub fn deadline(&self, state: &GoalState) -> Option<DateTime<Utc>> {
        if !state.is_goal_active || state.learned_streak == 0 {
            return None;
        }
        state
            .last_activity()
            .and_then(|last| last.checked_add_signed(self.window()))
    }
}
