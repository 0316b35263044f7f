//! Timer engine
//!
//! Drives a timer machine with a periodic tick source and publishes its
//! snapshots to subscribers.

pub mod ticker;
pub mod timer_engine;

pub use ticker::{IntervalTicker, TickCallback, TickGuard, TickSource};
pub use timer_engine::{create_timer, Subscription, TimerEngine};
