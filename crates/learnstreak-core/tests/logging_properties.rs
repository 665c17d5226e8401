//! Property tests for day logging.

use chrono::{DateTime, Duration, TimeZone, Utc};
use learnstreak_core::{DayStatus, EngineConfig, GoalDuration, GoalEngine, MemoryStore};
use proptest::prelude::*;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
}

fn any_status() -> impl Strategy<Value = DayStatus> {
    prop_oneof![Just(DayStatus::Learned), Just(DayStatus::Frozen)]
}

fn duration() -> impl Strategy<Value = GoalDuration> {
    prop_oneof![
        Just(GoalDuration::Week),
        Just(GoalDuration::Month),
        Just(GoalDuration::Year),
    ]
}

/// A sequence of (day offset, minute within the day, status) logs.
fn logs() -> impl Strategy<Value = Vec<(i64, i64, DayStatus)>> {
    prop::collection::vec((0i64..40, 0i64..1440, any_status()), 0..30)
}

fn engine(duration: GoalDuration) -> GoalEngine<MemoryStore, Utc> {
    let mut engine =
        GoalEngine::open_at(MemoryStore::new(), Utc, EngineConfig::default(), start()).unwrap();
    engine.start_goal("Rust", duration, start()).unwrap();
    engine
}

proptest! {
    #[test]
    fn second_log_on_same_day_changes_nothing(
        duration in duration(),
        history in logs(),
        day in 0i64..40,
        first in 0i64..1440,
        second in 0i64..1440,
        status in any_status(),
    ) {
        let mut engine = engine(duration);
        for (offset, minute, logged) in history {
            let at = start() + Duration::days(offset) + Duration::minutes(minute);
            engine.log_day(logged, at).unwrap();
        }

        let base = start() + Duration::days(day);
        engine.log_day(status, base + Duration::minutes(first)).unwrap();
        let after_first = engine.state().clone();
        let event = engine.log_day(status, base + Duration::minutes(second)).unwrap();

        prop_assert!(event.is_none());
        prop_assert_eq!(engine.state(), &after_first);
    }

    #[test]
    fn freezes_never_increase_or_underflow(
        duration in duration(),
        history in logs(),
    ) {
        let mut engine = engine(duration);
        let total = engine.total_freezes();
        let mut previous = engine.freezes_left();

        for (offset, minute, status) in history {
            let at = start() + Duration::days(offset) + Duration::minutes(minute);
            engine.log_day(status, at).unwrap();
            engine.enforce_streak_rule(at).unwrap();

            let left = engine.freezes_left();
            prop_assert!(left <= previous);
            prop_assert_eq!(
                (total - left) as usize,
                engine.frozen_days_count()
            );
            previous = left;
        }
    }

    #[test]
    fn logs_after_end_date_are_ignored(
        duration in duration(),
        history in logs(),
        extra in 1i64..500,
        status in any_status(),
    ) {
        let mut engine = engine(duration);
        for (offset, minute, logged) in history {
            let at = start() + Duration::days(offset) + Duration::minutes(minute);
            engine.log_day(logged, at).unwrap();
        }

        let end = engine.state().end_date.unwrap();
        let before = engine.state().clone();
        let event = engine.log_day(status, end + Duration::hours(extra)).unwrap();

        prop_assert!(event.is_none());
        prop_assert_eq!(&engine.state().logged_days, &before.logged_days);
        prop_assert_eq!(engine.learned_streak(), before.learned_streak);
        prop_assert_eq!(engine.freezes_left(), before.freezes_left);
    }
}
