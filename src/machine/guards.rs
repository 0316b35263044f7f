//! Guards for the eventless transitions

use super::context::TimerContext;

/// Running -> Idle once the duration has been used up
pub(crate) fn check_expired(context: &TimerContext) -> bool {
    context.elapsed >= context.duration
}

/// Idle -> Running when the duration grew past the elapsed time
pub(crate) fn check_duration(context: &TimerContext) -> bool {
    context.elapsed < context.duration
}
