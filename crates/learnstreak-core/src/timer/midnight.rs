//! Self-rescheduling midnight timer.
//!
//! Fires at the next local midnight, then re-arms itself for the following
//! one. At most one task is live per timer: arming again replaces the
//! previous task, and cancelling is idempotent.
//!
//! The task sleeps on tokio's monotonic clock, which stops while the machine
//! is suspended. Every fire therefore re-reads the wall clock, hands that
//! instant to the callback and schedules the next midnight from it, so a late
//! wake-up never shifts later fires.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::task::JoinHandle;

use crate::calendar::next_midnight;

/// Source of the current wall-clock time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The system clock.
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

pub struct MidnightTimer {
    clock: Clock,
    task: Option<JoinHandle<()>>,
}

impl MidnightTimer {
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self { clock, task: None }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Schedule `on_midnight` for every local midnight from now on.
    ///
    /// The callback receives the wall-clock instant it actually fired at,
    /// never earlier than the boundary it was scheduled for. Must be called
    /// from within a tokio runtime; returns `false` (and stays disarmed)
    /// otherwise.
    pub fn arm<Tz, F>(&mut self, tz: Tz, mut on_midnight: F) -> bool
    where
        Tz: TimeZone + Send + 'static,
        F: FnMut(DateTime<Utc>) + Send + 'static,
    {
        self.cancel();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("midnight timer not armed: no tokio runtime");
            return false;
        };

        let clock = Arc::clone(&self.clock);
        let mut now = clock();
        tracing::debug!(boundary = %next_midnight(now, &tz), "midnight timer armed");

        self.task = Some(runtime.spawn(async move {
            loop {
                let boundary = next_midnight(now, &tz);
                tokio::time::sleep(until(now, boundary)).await;

                // The wall clock may read slightly behind the monotonic
                // wake-up; never report or reschedule from before the boundary.
                let fired = clock().max(boundary);
                if fired > boundary {
                    tracing::debug!(%boundary, %fired, "midnight timer fired late");
                }
                on_midnight(fired);
                now = clock().max(fired);
            }
        }));
        true
    }

    /// Stop the timer. Returns `false` if it was not armed.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                tracing::debug!("midnight timer cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Default for MidnightTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MidnightTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidnightTimer")
            .field("armed", &self.is_armed())
            .finish()
    }
}

impl Drop for MidnightTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn until(from: DateTime<Utc>, to: DateTime<Utc>) -> std::time::Duration {
    to.signed_duration_since(from).to_std().unwrap_or_default()
}

/// Wall clock that follows tokio's (paused) time from `start`, plus a
/// manually adjustable offset standing in for time spent suspended.
#[cfg(test)]
pub(crate) fn paused_clock(start: DateTime<Utc>) -> (Clock, Arc<std::sync::atomic::AtomicI64>) {
    use std::sync::atomic::{AtomicI64, Ordering};

    let origin = tokio::time::Instant::now();
    let skipped = Arc::new(AtomicI64::new(0));
    let offset = Arc::clone(&skipped);
    let clock: Clock = Arc::new(move || {
        let elapsed = chrono::Duration::from_std(origin.elapsed()).unwrap_or_default();
        start + elapsed + chrono::Duration::seconds(offset.load(Ordering::SeqCst))
    });
    (clock, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::sync::atomic::Ordering;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn fires_each_midnight_until_cancelled() {
        let (clock, _) = paused_clock(Utc.with_ymd_and_hms(2025, 3, 3, 23, 59, 0).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = MidnightTimer::with_clock(clock);

        assert!(timer.arm(Utc, move |fired| {
            let _ = tx.send(fired);
        }));
        assert!(timer.is_armed());

        let first = rx.recv().await.unwrap();
        assert_eq!(first, Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap());
        let second = rx.recv().await.unwrap();
        assert_eq!(second, Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap());

        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.is_armed());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn boundaries_follow_time_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let (clock, _) = paused_clock(Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = MidnightTimer::with_clock(clock);

        timer.arm(tz, move |fired| {
            let _ = tx.send(fired);
        });
        // Local midnight in UTC+2 is 22:00 UTC.
        assert_eq!(
            rx.recv().await.unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 3, 22, 0, 0).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_wake_reports_real_time_and_realigns() {
        let (clock, skipped) = paused_clock(Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = MidnightTimer::with_clock(clock);
        timer.arm(Utc, move |fired| {
            let _ = tx.send(fired);
        });

        // Suspended for 8h: the wall clock moves, tokio's clock does not.
        skipped.store(8 * 3600, Ordering::SeqCst);

        assert_eq!(
            rx.recv().await.unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 4, 8, 0, 0).unwrap()
        );
        // The next fire is back on the real midnight.
        assert_eq!(
            rx.recv().await.unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_previous_task() {
        let (clock, _) = paused_clock(Utc.with_ymd_and_hms(2025, 3, 3, 20, 0, 0).unwrap());
        let (tx_old, mut rx_old) = mpsc::unbounded_channel::<DateTime<Utc>>();
        let (tx_new, mut rx_new) = mpsc::unbounded_channel();
        let mut timer = MidnightTimer::with_clock(clock);

        timer.arm(Utc, move |fired| {
            let _ = tx_old.send(fired);
        });
        timer.arm(Utc, move |fired| {
            let _ = tx_new.send(fired);
        });

        assert!(rx_new.recv().await.is_some());
        assert_eq!(rx_old.recv().await, None);
    }

    #[test]
    fn arm_outside_runtime_is_refused() {
        let mut timer = MidnightTimer::new();
        assert!(!timer.arm(Utc, |_| {}));
        assert!(!timer.is_armed());
        assert!(!timer.cancel());
    }
}
