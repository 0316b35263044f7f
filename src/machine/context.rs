//! Timer context: the mutable data owned by one machine

use serde::Serialize;
use tokio::time::Instant;

use crate::config::TimerOptions;

/// Time accounting for a single countdown, all quantities in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerContext {
    /// Running time at which the timer expires
    pub duration: f64,
    /// Running time accounted so far, always within `0..=duration`
    pub elapsed: f64,
    /// Running time folded in from completed intervals
    pub offset: f64,
    /// Start of the current running interval
    #[serde(skip)]
    pub start_time: Instant,
    /// Tick period
    pub interval: f64,
}

impl TimerContext {
    pub fn new(options: &TimerOptions, now: Instant) -> Self {
        Self {
            duration: options.duration,
            elapsed: 0.0,
            offset: 0.0,
            start_time: now,
            interval: options.interval,
        }
    }

    /// Seconds left before expiry
    pub fn remaining(&self) -> f64 {
        round_centis((self.duration - self.elapsed).max(0.0))
    }

    /// Running time at `now`: the current interval plus everything folded before it,
    /// clamped to the duration.
    pub(crate) fn running_elapsed(&self, now: Instant) -> f64 {
        round_centis(self.running_total(now))
    }

    /// Unrounded running time at `now`, clamped to the duration
    pub(crate) fn running_total(&self, now: Instant) -> f64 {
        let current = now.saturating_duration_since(self.start_time).as_secs_f64();
        (current + self.offset).min(self.duration)
    }
}

/// Round to hundredths of a second. Only applied to displayed values, never
/// to the offset.
pub(crate) fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
