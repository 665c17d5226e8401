//! # learnstreak core library
//!
//! Business logic for the learnstreak habit tracker: a user declares a
//! learning goal for a week, a month or a year and logs each day as
//! *learned* or *frozen*. The library keeps the streak, spends the freeze
//! budget, resets stale streaks, and persists everything between runs.
//! The `learnstreak` CLI and any GUI are thin layers over the same engine.
//!
//! ## Architecture
//!
//! - **Goal engine**: owns the goal state, validates every mutation and
//!   writes it through to storage. It never reads the clock itself; every
//!   operation takes the current instant from the caller.
//! - **Calendar**: pure date math for day keys, week spans and month grids
//! - **Storage**: SQLite key-value persistence and TOML configuration
//! - **Timer / session**: midnight re-checks while the log screen is open
//!
//! ## Key Components
//!
//! - [`GoalEngine`]: goal and streak state machine
//! - [`StreakRule`]: the inactivity reset rule
//! - [`LogDaySession`]: lifecycle glue for the logging screen
//! - [`Database`]: persisted goal record
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod goal;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, PersistenceError};
pub use events::Event;
pub use goal::{
    DayStatus, EngineConfig, GoalDuration, GoalEngine, GoalPhase, GoalSnapshot, GoalState,
    StreakRule,
};
pub use session::{LogDaySession, ScenePhase, SharedEngine};
pub use storage::{Config, Database, GoalStore, MemoryStore};
pub use timer::{system_clock, Clock, MidnightTimer};
