//! Goal & streak state engine.
//!
//! The engine owns the single [`GoalState`] of the application, hydrates it
//! from a [`GoalStore`] when opened and writes it back after every applied
//! mutation. It does not keep time on its own: every date-dependent
//! operation takes the current instant from the caller.
//!
//! ## Lifecycle
//!
//! ```text
//! NoGoal -> start_goal -> Active -> (now > end_date) -> Complete
//!    ^                      |                             |
//!    +------ reset_goal ----+------ update_goal ----------+--> Active
//! ```
//!
//! ## Guards
//!
//! Redundant or disallowed operations are silent: they return `Ok(None)`
//! and leave the state untouched. `Err` is reserved for storage failures,
//! in which case the in-memory state is rolled back to what it was before
//! the call.

use chrono::{DateTime, Local, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::model::{DayStatus, GoalDuration, GoalPhase, GoalState};
use super::streak::{StreakRule, StreakRuleConfig};
use crate::calendar;
use crate::error::{PersistenceError, Result};
use crate::events::Event;
use crate::storage::{record, GoalStore};

/// Engine settings, usually derived from [`crate::Config::engine_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name given to goals started with an empty name.
    pub default_goal_name: String,
    pub streak: StreakRuleConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_goal_name: "Swift".into(),
            streak: StreakRuleConfig::default(),
        }
    }
}

/// Handle returned by [`GoalEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Event, &GoalSnapshot) + Send>;

/// Read-only view of the engine for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub goal: String,
    pub duration: GoalDuration,
    pub phase: GoalPhase,
    pub is_goal_active: bool,
    pub is_goal_complete: bool,
    pub today: String,
    pub is_today_logged: bool,
    pub today_status: Option<DayStatus>,
    pub learned_streak: u32,
    pub freezes_left: u32,
    pub total_freezes: u32,
    pub frozen_days_count: usize,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// When the streak resets if nothing else is logged.
    pub streak_deadline: Option<DateTime<Utc>>,
    pub at: DateTime<Utc>,
}

/// Core goal engine.
pub struct GoalEngine<S, Tz: TimeZone = Local> {
    state: GoalState,
    store: S,
    tz: Tz,
    rule: StreakRule,
    default_goal_name: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: GoalStore, Tz: TimeZone> GoalEngine<S, Tz> {
    /// Hydrate from `store` and enforce the streak rule at the current time.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read, or if the startup
    /// streak reset cannot be persisted. A record that exists but cannot be
    /// decoded is discarded with a warning.
    pub fn open(store: S, tz: Tz, config: EngineConfig) -> Result<Self> {
        Self::open_at(store, tz, config, Utc::now())
    }

    /// Like [`Self::open`] with an explicit startup instant.
    pub fn open_at(store: S, tz: Tz, config: EngineConfig, now: DateTime<Utc>) -> Result<Self> {
        let mut engine = Self::hydrate(store, tz, config)?;
        engine.enforce_streak_rule(now)?;
        Ok(engine)
    }

    /// Load the persisted state without enforcing the streak rule.
    ///
    /// The caller is expected to call [`Self::enforce_streak_rule`] itself,
    /// typically after subscribing so the startup reset is observed.
    pub fn hydrate(store: S, tz: Tz, config: EngineConfig) -> Result<Self> {
        let state = match store.load()? {
            None => GoalState::default(),
            Some(blob) => match record::decode(&blob) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable goal record");
                    GoalState::default()
                }
            },
        };

        Ok(Self {
            state,
            store,
            tz,
            rule: StreakRule::with_config(config.streak),
            default_goal_name: config.default_goal_name,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &GoalState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    pub fn streak_rule(&self) -> &StreakRule {
        &self.rule
    }

    pub fn goal(&self) -> &str {
        &self.state.goal
    }

    pub fn duration(&self) -> GoalDuration {
        self.state.duration
    }

    pub fn learned_streak(&self) -> u32 {
        self.state.learned_streak
    }

    pub fn freezes_left(&self) -> u32 {
        self.state.freezes_left
    }

    pub fn total_freezes(&self) -> u32 {
        self.state.total_freezes
    }

    pub fn frozen_days_count(&self) -> usize {
        self.state.frozen_days_count()
    }

    pub fn is_goal_active(&self) -> bool {
        self.state.is_goal_active
    }

    pub fn is_goal_complete(&self, now: DateTime<Utc>) -> bool {
        self.state.is_complete(now)
    }

    pub fn phase(&self, now: DateTime<Utc>) -> GoalPhase {
        self.state.phase(now)
    }

    /// Date-key of the local day containing `now`.
    pub fn today_key(&self, now: DateTime<Utc>) -> String {
        calendar::date_key_in(now, &self.tz)
    }

    pub fn today_status(&self, now: DateTime<Utc>) -> Option<DayStatus> {
        self.state.status_for(&self.today_key(now))
    }

    pub fn is_today_logged(&self, now: DateTime<Utc>) -> bool {
        self.today_status(now).is_some()
    }

    pub fn status_for(&self, date_key: &str) -> Option<DayStatus> {
        self.state.status_for(date_key)
    }

    pub fn logged_days(&self) -> impl Iterator<Item = (&str, DayStatus)> {
        self.state
            .logged_days
            .iter()
            .map(|(key, status)| (key.as_str(), *status))
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> GoalSnapshot {
        let today = self.today_key(now);
        let today_status = self.state.status_for(&today);
        GoalSnapshot {
            goal: self.state.goal.clone(),
            duration: self.state.duration,
            phase: self.phase(now),
            is_goal_active: self.state.is_goal_active,
            is_goal_complete: self.is_goal_complete(now),
            today,
            is_today_logged: today_status.is_some(),
            today_status,
            learned_streak: self.state.learned_streak,
            freezes_left: self.state.freezes_left,
            total_freezes: self.state.total_freezes,
            frozen_days_count: self.state.frozen_days_count(),
            start_date: self.state.start_date,
            end_date: self.state.end_date,
            streak_deadline: self.rule.deadline(&self.state),
            at: now,
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Register a listener called after every applied mutation.
    ///
    /// The listener receives the event and a snapshot of the state after the
    /// mutation, taken at the event's instant. It runs while the engine is
    /// mutably borrowed (and, for a shared engine, while its lock is held),
    /// so it must read state from the snapshot rather than the engine.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Event, &GoalSnapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new goal, discarding any previous one.
    pub fn start_goal(
        &mut self,
        name: &str,
        duration: GoalDuration,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        let previous = self.begin(name, duration, now);
        let event = self.started_event(now, false);
        tracing::info!(goal = %self.state.goal, %duration, "goal started");
        self.commit(previous, event)
    }

    /// Re-select the goal. Same effect as [`Self::start_goal`]: the current
    /// streak and log history are forfeited.
    pub fn update_goal(
        &mut self,
        name: &str,
        duration: GoalDuration,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        let previous = self.begin(name, duration, now);
        let event = self.started_event(now, true);
        tracing::info!(goal = %self.state.goal, %duration, "goal updated");
        self.commit(previous, event)
    }

    /// Log today (in the engine's time zone) as learned or frozen.
    ///
    /// Returns `Ok(None)` without touching state if there is no active goal,
    /// today is already logged, the goal is complete, or a freeze is
    /// requested with no freezes left.
    pub fn log_day(&mut self, status: DayStatus, now: DateTime<Utc>) -> Result<Option<Event>> {
        let now = now.trunc_subsecs(6);
        let key = self.today_key(now);

        if !self.state.is_goal_active {
            tracing::debug!(%key, "log ignored: no active goal");
            return Ok(None);
        }
        if self.state.logged_days.contains_key(&key) {
            tracing::debug!(%key, "log ignored: day already logged");
            return Ok(None);
        }
        if self.state.is_complete(now) {
            tracing::debug!(%key, "log ignored: goal complete");
            return Ok(None);
        }
        if status == DayStatus::Frozen && self.state.freezes_left == 0 {
            tracing::debug!(%key, "freeze ignored: no freezes left");
            return Ok(None);
        }

        let previous = self.state.clone();
        match status {
            DayStatus::Learned => {
                self.state.learned_streak = self.state.learned_streak.saturating_add(1);
                self.state.last_learned_at = Some(now);
            }
            DayStatus::Frozen => {
                self.state.freezes_left -= 1;
                self.state.last_frozen_at = Some(now);
            }
        }
        self.state.logged_days.insert(key.clone(), status);

        tracing::debug!(%key, %status, streak = self.state.learned_streak, "day logged");
        let event = Event::DayLogged {
            date_key: key,
            status,
            learned_streak: self.state.learned_streak,
            freezes_left: self.state.freezes_left,
            at: now,
        };
        self.commit(previous, event)
    }

    /// Reset the streak if the inactivity window has passed.
    ///
    /// Call at startup, whenever the app returns to the foreground and at
    /// every local midnight while the log screen is visible.
    pub fn enforce_streak_rule(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        let Some(reset) = self.rule.evaluate(&self.state, now) else {
            return Ok(None);
        };

        let previous = self.state.clone();
        self.state.learned_streak = 0;
        tracing::info!(
            streak_before = reset.streak_before,
            reason = %reset.reason.description(),
            "streak reset"
        );
        let event = Event::StreakReset {
            streak_before: reset.streak_before,
            reason: reset.reason,
            at: reset.at,
        };
        self.commit(previous, event)
    }

    /// Return every field to its default and delete the persisted record.
    ///
    /// Idempotent. Only emits an event when there was something to clear.
    pub fn reset_goal(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        let previous = std::mem::take(&mut self.state);
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to delete goal record, rolling back");
            self.state = previous;
            return Err(err.into());
        }
        if previous.is_empty() {
            return Ok(None);
        }

        tracing::info!(goal = %previous.goal, "goal cleared");
        let event = Event::GoalCleared {
            at: now.trunc_subsecs(6),
        };
        self.notify(&event);
        Ok(Some(event))
    }

    /// Alias of [`Self::reset_goal`] used by the "set new goal" flow.
    pub fn set_new_goal(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        self.reset_goal(now)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Replace the state with a fresh goal. Returns the previous state.
    fn begin(&mut self, name: &str, duration: GoalDuration, now: DateTime<Utc>) -> GoalState {
        let now = now.trunc_subsecs(6);
        let goal = if name.is_empty() {
            self.default_goal_name.clone()
        } else {
            name.to_string()
        };
        let total_freezes = duration.freeze_budget();

        let fresh = GoalState {
            goal,
            duration,
            start_date: Some(now),
            end_date: Some(duration.end_date_from(now, &self.tz)),
            learned_streak: 0,
            freezes_left: total_freezes,
            total_freezes,
            logged_days: Default::default(),
            is_goal_active: true,
            last_learned_at: None,
            last_frozen_at: None,
        };
        std::mem::replace(&mut self.state, fresh)
    }

    fn started_event(&self, now: DateTime<Utc>, update: bool) -> Event {
        let goal = self.state.goal.clone();
        let duration = self.state.duration;
        let start_date = self.state.start_date.unwrap_or(now);
        let end_date = self.state.end_date.unwrap_or(now);
        let total_freezes = self.state.total_freezes;
        if update {
            Event::GoalUpdated {
                goal,
                duration,
                start_date,
                end_date,
                total_freezes,
                at: now,
            }
        } else {
            Event::GoalStarted {
                goal,
                duration,
                start_date,
                end_date,
                total_freezes,
                at: now,
            }
        }
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if self.state.is_goal_active {
            let blob = record::encode(&self.state)?;
            self.store.save(&blob)
        } else {
            self.store.clear()
        }
    }

    /// Persist the current state; on failure restore `previous`.
    fn commit(&mut self, previous: GoalState, event: Event) -> Result<Option<Event>> {
        if let Err(err) = self.persist() {
            tracing::warn!(error = %err, event = event.kind(), "persist failed, rolling back");
            self.state = previous;
            return Err(err.into());
        }
        self.notify(&event);
        Ok(Some(event))
    }

    fn notify(&self, event: &Event) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot(event.at());
        for (_, listener) in &self.listeners {
            listener(event, &snapshot);
        }
    }
}
