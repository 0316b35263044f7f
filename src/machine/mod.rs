//! Countdown state machine
//!
//! Pure state and transition logic. Nothing here spawns tasks or reads the
//! clock; the engine feeds in events together with the current instant.

mod actions;
pub mod context;
pub mod event;
mod guards;
pub mod state_machine;
pub mod status;

pub use context::TimerContext;
pub use event::TimerEvent;
pub(crate) use event::MachineEvent;
pub use state_machine::{TimerMachine, TimerSnapshot};
pub use status::TimerStatus;
