//! Transition table for a single countdown

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::{
    actions,
    context::TimerContext,
    event::{MachineEvent, TimerEvent},
    guards,
    status::TimerStatus,
};
use crate::config::TimerOptions;

/// Observable state of a timer: its status tag plus context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerStatus,
    pub context: TimerContext,
}

impl TimerSnapshot {
    pub fn remaining(&self) -> f64 {
        self.context.remaining()
    }
}

/// A countdown state machine with time supplied by the caller.
///
/// The machine never reads a clock on its own; every transition receives the
/// instant it happens at.
#[derive(Debug, Clone)]
pub struct TimerMachine {
    status: TimerStatus,
    context: TimerContext,
}

impl TimerMachine {
    /// Build a machine in `Running` with a zeroed context. Options are assumed
    /// validated.
    pub fn new(options: &TimerOptions, now: Instant) -> Self {
        let mut machine = Self {
            status: TimerStatus::Running,
            context: TimerContext::new(options, now),
        };
        actions::enter_running(&mut machine.context, now);
        machine.settle(now);
        machine
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn context(&self) -> &TimerContext {
        &self.context
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.status,
            context: self.context.clone(),
        }
    }

    /// Apply an external event. Returns false when the current state ignores it.
    pub fn send(&mut self, event: TimerEvent, now: Instant) -> bool {
        self.transition(event.into(), now)
    }

    /// Apply one event, then follow eventless transitions until stable.
    pub(crate) fn transition(&mut self, event: MachineEvent, now: Instant) -> bool {
        use MachineEvent::{External, Tick};
        use TimerStatus::{Paused, Running};

        match (self.status, event) {
            (_, External(TimerEvent::Reset)) => {
                actions::on_reset(&mut self.context);
                self.enter_running(now);
            }
            (status, External(TimerEvent::DurationUpdate { value })) => {
                actions::on_duration_update(&mut self.context, value, status.is_running(), now);
            }
            (Running, Tick) => {
                actions::on_tick(&mut self.context, now);
                trace!(elapsed = self.context.elapsed, "tick");
            }
            (Running, External(TimerEvent::Pause)) => {
                actions::on_pause(&mut self.context, now);
                self.status = Paused;
            }
            (Paused, External(TimerEvent::Unpause)) => {
                self.enter_running(now);
            }
            (status, event) => {
                debug!(%status, ?event, "event ignored");
                return false;
            }
        }

        self.settle(now);
        true
    }

    fn enter_running(&mut self, now: Instant) {
        self.status = TimerStatus::Running;
        actions::enter_running(&mut self.context, now);
    }

    /// Follow the `always` transitions. Each one flips the guard that fired it,
    /// so this stops after at most one step.
    fn settle(&mut self, now: Instant) {
        loop {
            match self.status {
                TimerStatus::Running if guards::check_expired(&self.context) => {
                    actions::on_expire(&mut self.context);
                    self.status = TimerStatus::Idle;
                }
                TimerStatus::Idle if guards::check_duration(&self.context) => {
                    self.enter_running(now);
                }
                _ => break,
            }
        }
    }
}
