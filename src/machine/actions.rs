//! Context transformations attached to transitions
//!
//! Elapsed time is always recomputed from `start_time` and `offset`, never
//! accumulated tick by tick, so missed or late ticks and the length of a pause
//! have no effect on the result.

use tokio::time::Instant;

use super::context::{round_centis, TimerContext};

/// Begin a new running interval
pub(crate) fn enter_running(context: &mut TimerContext, now: Instant) {
    context.start_time = now;
}

pub(crate) fn on_tick(context: &mut TimerContext, now: Instant) {
    context.elapsed = context.running_elapsed(now);
}

/// Freeze elapsed and fold the finished interval into the offset
pub(crate) fn on_pause(context: &mut TimerContext, now: Instant) {
    fold_interval(context, now);
}

/// Add the exact running interval up to `now` to the offset and derive the
/// displayed elapsed from it.
fn fold_interval(context: &mut TimerContext, now: Instant) {
    context.offset = context.running_total(now);
    context.elapsed = round_centis(context.offset).min(context.duration);
}

/// Pin elapsed to the duration; the offset keeps the full run so a later
/// duration increase continues from here.
pub(crate) fn on_expire(context: &mut TimerContext) {
    context.elapsed = context.duration;
    context.offset = context.duration;
}

pub(crate) fn on_reset(context: &mut TimerContext) {
    context.elapsed = 0.0;
    context.offset = 0.0;
}

/// Shift the duration by `delta` seconds, saturating at zero.
///
/// While running, the interval so far is folded into the offset and a fresh
/// interval starts at `now`, so the next tick never measures against a stale
/// baseline.
pub(crate) fn on_duration_update(
    context: &mut TimerContext,
    delta: f64,
    running: bool,
    now: Instant,
) {
    context.duration = (context.duration + delta).max(0.0);

    if running {
        fold_interval(context, now);
        context.start_time = now;
    } else {
        context.elapsed = context.elapsed.min(context.duration);
        context.offset = context.offset.min(context.duration);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::TimerOptions;

    fn context_at(duration: f64, now: Instant) -> TimerContext {
        TimerContext::new(&TimerOptions::new(duration), now)
    }

    #[test]
    fn test_tick_recomputes_from_start_time() {
        let start = Instant::now();
        let mut context = context_at(10.0, start);

        on_tick(&mut context, start + Duration::from_millis(2500));
        assert_eq!(context.elapsed, 2.5);

        // A skipped tick does not lose time
        on_tick(&mut context, start + Duration::from_millis(7000));
        assert_eq!(context.elapsed, 7.0);
    }

    #[test]
    fn test_tick_clamps_to_duration() {
        let start = Instant::now();
        let mut context = context_at(1.0, start);
        on_tick(&mut context, start + Duration::from_secs(5));
        assert_eq!(context.elapsed, 1.0);
    }

    #[test]
    fn test_pause_then_resume_ignores_pause_length() {
        let start = Instant::now();
        let mut context = context_at(10.0, start);

        let paused_at = start + Duration::from_secs(3);
        on_pause(&mut context, paused_at);
        assert_eq!(context.elapsed, 3.0);
        assert_eq!(context.offset, 3.0);

        let resumed_at = paused_at + Duration::from_secs(5);
        enter_running(&mut context, resumed_at);
        on_tick(&mut context, resumed_at + Duration::from_secs(2));
        assert_eq!(context.elapsed, 5.0);
    }

    #[test]
    fn test_expire_folds_whole_run() {
        let mut context = context_at(4.0, Instant::now());
        context.elapsed = 3.99;
        on_expire(&mut context);
        assert_eq!(context.elapsed, 4.0);
        assert_eq!(context.offset, 4.0);
    }

    #[test]
    fn test_duration_update_while_running_starts_fresh_interval() {
        let start = Instant::now();
        let mut context = context_at(10.0, start);

        let now = start + Duration::from_secs(4);
        on_duration_update(&mut context, 5.0, true, now);
        assert_eq!(context.duration, 15.0);
        assert_eq!(context.elapsed, 4.0);
        assert_eq!(context.offset, 4.0);
        assert_eq!(context.start_time, now);

        on_tick(&mut context, now + Duration::from_secs(1));
        assert_eq!(context.elapsed, 5.0);
    }

    #[test]
    fn test_duration_decrease_clamps_elapsed() {
        let mut context = context_at(10.0, Instant::now());
        context.elapsed = 6.0;
        context.offset = 6.0;
        on_duration_update(&mut context, -7.0, false, Instant::now());
        assert_eq!(context.duration, 3.0);
        assert_eq!(context.elapsed, 3.0);
        assert_eq!(context.offset, 3.0);
    }

    #[test]
    fn test_duration_never_goes_negative() {
        let mut context = context_at(2.0, Instant::now());
        on_duration_update(&mut context, -5.0, false, Instant::now());
        assert_eq!(context.duration, 0.0);
        assert_eq!(context.elapsed, 0.0);
    }

    #[test]
    fn test_short_runs_between_pauses_add_up() {
        let mut now = Instant::now();
        let mut context = context_at(10.0, now);

        for _ in 0..100 {
            now += Duration::from_millis(4);
            on_pause(&mut context, now);
            now += Duration::from_millis(1);
            enter_running(&mut context, now);
        }

        on_tick(&mut context, now);
        assert_eq!(context.elapsed, 0.4);
        assert!((context.offset - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_frequent_duration_updates_keep_running_time() {
        let mut now = Instant::now();
        let mut context = context_at(10.0, now);

        for _ in 0..100 {
            now += Duration::from_millis(4);
            on_duration_update(&mut context, 0.0, true, now);
        }

        assert_eq!(context.elapsed, 0.4);
        on_tick(&mut context, now);
        assert_eq!(context.elapsed, 0.4);
    }

    #[test]
    fn test_reset_zeroes_accounting() {
        let mut context = context_at(10.0, Instant::now());
        context.elapsed = 8.0;
        context.offset = 6.0;
        on_reset(&mut context);
        assert_eq!(context.elapsed, 0.0);
        assert_eq!(context.offset, 0.0);
        assert_eq!(context.duration, 10.0);
    }
}
