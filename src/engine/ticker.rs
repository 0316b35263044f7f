//! Periodic tick sources
//!
//! A tick source is acquired when the timer enters `Running` and released
//! when it leaves. Release is tied to dropping the returned [`TickGuard`].

use std::{fmt, sync::Arc, time::Duration};

use tokio::{
    runtime::Handle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::error::TimerError;

/// Callback invoked on every tick
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// Keeps a tick source alive; dropping it cancels the source
pub struct TickGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickGuard {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TickGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickGuard").finish_non_exhaustive()
    }
}

/// Something that can call back periodically until its guard is dropped.
///
/// The engine calls `start` and drops the guard without holding any of its
/// locks, so `on_tick` may be invoked from any thread, including
/// synchronously from inside `start` or the guard's cancel closure.
pub trait TickSource: Send + Sync + 'static {
    fn start(&self, period: Duration, on_tick: TickCallback) -> TickGuard;
}

/// Tick source backed by a tokio interval task
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    handle: Handle,
}

impl IntervalTicker {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on
    pub fn from_current() -> Result<Self, TimerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| TimerError::NoRuntime)
    }
}

impl TickSource for IntervalTicker {
    fn start(&self, period: Duration, on_tick: TickCallback) -> TickGuard {
        let task = self.handle.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // Late ticks are dropped, elapsed time comes from the clock anyway
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                on_tick();
            }
        });

        TickGuard::new(move || task.abort())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_guard_runs_cancel_once_on_drop() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cancelled);
        let guard = TickGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_runtime() {
        assert_eq!(IntervalTicker::from_current().unwrap_err(), TimerError::NoRuntime);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticks_until_guard_dropped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let ticker = IntervalTicker::from_current().unwrap();

        let guard = ticker.start(
            Duration::from_millis(100),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(550)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 5);

        drop(guard);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 5);
    }
}
