//! Events accepted by the timer machine

use serde::{Deserialize, Serialize};

/// Events callers may send to a timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    #[serde(rename = "PAUSE")]
    Pause,
    #[serde(rename = "UNPAUSE")]
    Unpause,
    #[serde(rename = "RESET")]
    Reset,
    /// Shift the duration by a signed number of seconds
    #[serde(rename = "DURATION.UPDATE")]
    DurationUpdate { value: f64 },
    /// Any event type this version does not know; always ignored
    #[serde(other)]
    Unknown,
}

/// Everything the machine reacts to, including the internal tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MachineEvent {
    Tick,
    External(TimerEvent),
}

impl From<TimerEvent> for MachineEvent {
    fn from(event: TimerEvent) -> Self {
        MachineEvent::External(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let pause: TimerEvent = serde_json::from_str(r#"{"type":"PAUSE"}"#).unwrap();
        assert_eq!(pause, TimerEvent::Pause);

        let update: TimerEvent =
            serde_json::from_str(r#"{"type":"DURATION.UPDATE","value":-2.5}"#).unwrap();
        assert_eq!(update, TimerEvent::DurationUpdate { value: -2.5 });

        let json = serde_json::to_string(&TimerEvent::Reset).unwrap();
        assert_eq!(json, r#"{"type":"RESET"}"#);
    }

    #[test]
    fn test_unknown_event_type_is_tolerated() {
        let event: TimerEvent = serde_json::from_str(r#"{"type":"LAP"}"#).unwrap();
        assert_eq!(event, TimerEvent::Unknown);
    }
}
