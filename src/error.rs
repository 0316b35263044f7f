//! Error types for timer construction

use thiserror::Error;

/// Errors raised while building a timer engine.
///
/// Once an engine exists, none of its operations fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimerError {
    #[error("invalid duration: {0} (must be a finite number of seconds >= 0)")]
    InvalidDuration(f64),
    #[error("invalid tick interval: {0} (must be at least 1ns and fit in a Duration)")]
    InvalidInterval(f64),
    #[error("no tokio runtime available to drive the tick source")]
    NoRuntime,
}
