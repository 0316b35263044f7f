//! Shared state for the HTTP handlers

use std::{
    sync::{Mutex, PoisonError},
    time::Instant,
};

use chrono::{DateTime, Utc};

use crate::{
    engine::TimerEngine,
    machine::{TimerEvent, TimerSnapshot},
};

/// The timer being served plus server metadata
pub struct ApiState {
    pub engine: TimerEngine,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl ApiState {
    pub fn new(engine: TimerEngine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
        }
    }

    /// Forward an event to the timer and record it as the last action
    pub fn send(&self, action: &str, event: TimerEvent) -> TimerSnapshot {
        self.engine.send(event);

        let mut last_action = self.last_action.lock().unwrap_or_else(PoisonError::into_inner);
        *last_action = Some((action.to_string(), Utc::now()));
        drop(last_action);

        self.engine.snapshot()
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().unwrap_or_else(PoisonError::into_inner);
        match last_action.as_ref() {
            Some((action, at)) => (Some(action.clone()), Some(*at)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_seconds(self.start_time.elapsed().as_secs())
    }
}

/// Render whole seconds as `1h 2m 3s`, dropping leading zero units
pub fn format_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(7), "7s");
        assert_eq!(format_seconds(125), "2m 5s");
        assert_eq!(format_seconds(3725), "1h 2m 5s");
    }
}
