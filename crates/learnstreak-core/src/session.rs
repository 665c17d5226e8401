//! Log-day session: the non-visual half of the logging screen.
//!
//! A session shares the application's engine behind a mutex, keeps the
//! midnight timer armed while the screen is visible, re-checks the streak
//! when the app returns to the foreground, and carries the small amount of
//! view state the screen needs (selected date, week being shown).

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc, Weekday};

use crate::calendar::{self, Week};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::goal::{DayStatus, GoalEngine, GoalSnapshot};
use crate::storage::GoalStore;
use crate::timer::{Clock, MidnightTimer};

/// Engine shared between the UI thread and the midnight timer.
pub type SharedEngine<S, Tz = Local> = Arc<Mutex<GoalEngine<S, Tz>>>;

/// Application lifecycle as reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    Active,
    Inactive,
    Background,
}

pub struct LogDaySession<S, Tz: TimeZone = Local> {
    engine: SharedEngine<S, Tz>,
    timer: MidnightTimer,
    first_weekday: Weekday,
    phase: ScenePhase,
    selected_date: NaiveDate,
    week_reference: NaiveDate,
}

impl<S, Tz> LogDaySession<S, Tz>
where
    S: GoalStore + Send + 'static,
    Tz: TimeZone + Send + 'static,
{
    pub fn new(
        engine: SharedEngine<S, Tz>,
        first_weekday: Weekday,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let today = {
            let guard = lock(&engine)?;
            calendar::local_date(now, guard.time_zone())
        };
        Ok(Self {
            engine,
            timer: MidnightTimer::new(),
            first_weekday,
            phase: ScenePhase::Active,
            selected_date: today,
            week_reference: today,
        })
    }

    /// Replace the wall clock the midnight timer reads. Any armed timer is
    /// cancelled.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.timer = MidnightTimer::with_clock(clock);
        self
    }

    pub fn engine(&self) -> &SharedEngine<S, Tz> {
        &self.engine
    }

    /// The screen became visible: arm the midnight streak check.
    ///
    /// Each check runs at the wall-clock time the timer actually woke, so a
    /// midnight slept through while suspended is judged against the real gap.
    pub fn on_appear(&mut self) -> Result<bool> {
        let tz = lock(&self.engine)?.time_zone().clone();
        let engine = Arc::clone(&self.engine);
        Ok(self.timer.arm(tz, move |fired| {
            let Ok(mut guard) = engine.lock() else {
                tracing::warn!("midnight check skipped: engine lock poisoned");
                return;
            };
            if let Err(err) = guard.enforce_streak_rule(fired) {
                tracing::warn!(error = %err, "midnight streak check failed");
            }
        }))
    }

    /// The screen is no longer visible. Safe to call repeatedly.
    pub fn on_disappear(&mut self) -> bool {
        self.timer.cancel()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Track lifecycle changes; entering the foreground re-checks the streak.
    pub fn on_phase_change(&mut self, phase: ScenePhase, now: DateTime<Utc>) -> Result<Option<Event>> {
        let previous = std::mem::replace(&mut self.phase, phase);
        if phase == ScenePhase::Active && previous != ScenePhase::Active {
            return lock(&self.engine)?.enforce_streak_rule(now);
        }
        Ok(None)
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    // ── Intents ──────────────────────────────────────────────────────

    pub fn log_day(&self, status: DayStatus, now: DateTime<Utc>) -> Result<Option<Event>> {
        lock(&self.engine)?.log_day(status, now)
    }

    pub fn set_new_goal(&self, now: DateTime<Utc>) -> Result<Option<Event>> {
        lock(&self.engine)?.set_new_goal(now)
    }

    // ── View state ───────────────────────────────────────────────────

    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<GoalSnapshot> {
        Ok(lock(&self.engine)?.snapshot(now))
    }

    /// e.g. "1 out of 2 Freezes used"
    pub fn freeze_status_text(&self) -> Result<String> {
        let engine = lock(&self.engine)?;
        Ok(format!(
            "{} out of {} Freezes used",
            engine.frozen_days_count(),
            engine.total_freezes()
        ))
    }

    pub fn is_freeze_disabled(&self, now: DateTime<Utc>) -> Result<bool> {
        let engine = lock(&self.engine)?;
        Ok(engine.is_today_logged(now) || engine.freezes_left() == 0)
    }

    pub fn week_dates(&self) -> Week {
        calendar::week_span(self.week_reference, self.first_weekday)
    }

    pub fn previous_week(&mut self) {
        self.week_reference = calendar::shift_week(self.week_reference, -1);
    }

    pub fn next_week(&mut self) {
        self.week_reference = calendar::shift_week(self.week_reference, 1);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.week_reference = date;
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Status of every day in the visible week, in column order.
    pub fn week_statuses(&self) -> Result<Vec<(NaiveDate, Option<DayStatus>)>> {
        let engine = lock(&self.engine)?;
        Ok(self
            .week_dates()
            .into_iter()
            .map(|date| (date, engine.status_for(&calendar::key_for_date(date))))
            .collect())
    }
}

fn lock<S, Tz: TimeZone>(
    engine: &SharedEngine<S, Tz>,
) -> Result<MutexGuard<'_, GoalEngine<S, Tz>>> {
    engine
        .lock()
        .map_err(|_| CoreError::Custom("goal engine lock poisoned".into()))
}
