//! Countdown Engine - a drift-free countdown timer state machine
//!
//! A timer runs for a configurable number of seconds, can be paused, resumed,
//! reset and have its duration changed while it runs, and reports expiry.
//! Elapsed time is always recomputed from the clock, so late or missed ticks
//! never skew it.

pub mod config;
pub mod error;
pub mod machine;
pub mod engine;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, TimerOptions};
pub use error::TimerError;
pub use machine::{TimerContext, TimerEvent, TimerMachine, TimerSnapshot, TimerStatus};
pub use engine::{create_timer, Subscription, TickSource, TimerEngine};
pub use api::{create_router, ApiState};
pub use utils::signals::shutdown_signal;
