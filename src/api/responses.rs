//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::machine::{TimerSnapshot, TimerStatus};

/// API response for endpoints that send an event
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: TimerStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.state,
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Body of `POST /duration`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DurationUpdateRequest {
    /// Signed number of seconds to add to the duration
    pub value: f64,
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Status response with derived timer figures
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub state: TimerStatus,
    pub elapsed: f64,
    pub duration: f64,
    pub remaining: f64,
    pub interval: f64,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
