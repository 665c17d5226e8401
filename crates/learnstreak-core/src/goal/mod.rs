mod engine;
mod model;
mod streak;

pub use engine::{EngineConfig, GoalEngine, GoalSnapshot, SubscriptionId};
pub use model::{DayStatus, GoalDuration, GoalPhase, GoalState};
pub use streak::{
    StreakResetEvent, StreakResetReason, StreakRule, StreakRuleConfig,
    DEFAULT_INACTIVITY_WINDOW_SECS,
};
