//! Timer status tags

use std::fmt;

use serde::{Deserialize, Serialize};

/// The state a timer machine is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Counting towards the duration, tick source active
    Running,
    /// Frozen by an explicit pause
    Paused,
    /// Expired: elapsed has reached the duration
    Idle,
}

impl TimerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerStatus::Running)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Idle => "idle",
        };
        f.write_str(name)
    }
}
