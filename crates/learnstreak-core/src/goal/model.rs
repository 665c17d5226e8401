use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Status written for a logged calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Learned,
    Frozen,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Learned => "learned",
            DayStatus::Frozen => "frozen",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "learned" => Ok(DayStatus::Learned),
            "frozen" => Ok(DayStatus::Frozen),
            other => Err(format!("unknown day status: {other}")),
        }
    }
}

/// Length of a goal, chosen when the goal starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalDuration {
    #[default]
    Week,
    Month,
    Year,
}

impl GoalDuration {
    pub const ALL: [GoalDuration; 3] = [GoalDuration::Week, GoalDuration::Month, GoalDuration::Year];

    /// Raw value used in the persisted record.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalDuration::Week => "Week",
            GoalDuration::Month => "Month",
            GoalDuration::Year => "Year",
        }
    }

    /// Number of freezes granted for a goal of this length.
    pub fn freeze_budget(&self) -> u32 {
        match self {
            GoalDuration::Week => 2,
            GoalDuration::Month => 8,
            GoalDuration::Year => 96,
        }
    }

    /// End of a goal started at `start`, using calendar arithmetic in `tz`.
    ///
    /// Month and year steps clamp to the last day of a shorter month
    /// (Jan 31 + 1 month = Feb 28/29). If the local result does not exist the
    /// same step is taken in UTC instead.
    pub fn end_date_from<Tz: TimeZone>(&self, start: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
        let local = start.with_timezone(tz);
        let stepped = match self {
            GoalDuration::Week => local.checked_add_days(Days::new(7)),
            GoalDuration::Month => local.checked_add_months(Months::new(1)),
            GoalDuration::Year => local.checked_add_months(Months::new(12)),
        };
        stepped
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| match self {
                GoalDuration::Week => start.checked_add_days(Days::new(7)),
                GoalDuration::Month => start.checked_add_months(Months::new(1)),
                GoalDuration::Year => start.checked_add_months(Months::new(12)),
            })
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Display for GoalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(GoalDuration::Week),
            "month" => Ok(GoalDuration::Month),
            "year" => Ok(GoalDuration::Year),
            other => Err(format!("unknown goal duration: {other}")),
        }
    }
}

/// Where a goal is in its lifecycle.
///
/// ```text
/// NoGoal -> (start) -> Active -> (now > end_date) -> Complete -> (reset | update) -> NoGoal | Active
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPhase {
    NoGoal,
    Active,
    /// The end date has passed; the goal is read-only.
    Complete,
}

/// All mutable domain state. One instance per running application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalState {
    pub goal: String,
    pub duration: GoalDuration,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub learned_streak: u32,
    pub freezes_left: u32,
    pub total_freezes: u32,
    /// Date-key -> status. Each key is written at most once.
    pub logged_days: BTreeMap<String, DayStatus>,
    pub is_goal_active: bool,
    pub last_learned_at: Option<DateTime<Utc>>,
    pub last_frozen_at: Option<DateTime<Utc>>,
}

impl GoalState {
    pub fn is_empty(&self) -> bool {
        *self == GoalState::default()
    }

    pub fn status_for(&self, key: &str) -> Option<DayStatus> {
        self.logged_days.get(key).copied()
    }

    pub fn frozen_days_count(&self) -> usize {
        self.logged_days
            .values()
            .filter(|s| **s == DayStatus::Frozen)
            .count()
    }

    /// True once `now` is past the end date. A state without an end date is
    /// never complete.
    pub fn is_complete(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| now > end)
    }

    /// Most recent learn or freeze, whichever is later.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        match (self.last_learned_at, self.last_frozen_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn phase(&self, now: DateTime<Utc>) -> GoalPhase {
        if !self.is_goal_active {
            GoalPhase::NoGoal
        } else if self.is_complete(now) {
            GoalPhase::Complete
        } else {
            GoalPhase::Active
        }
    }
}
