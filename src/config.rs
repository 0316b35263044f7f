//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::error::TimerError;

/// Default tick period in seconds
pub const DEFAULT_INTERVAL: f64 = 0.1;

fn default_interval() -> f64 {
    DEFAULT_INTERVAL
}

/// Options used to construct a timer engine
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TimerOptions {
    /// Seconds of running time after which the timer expires
    pub duration: f64,
    /// Tick period in seconds
    #[serde(default = "default_interval")]
    pub interval: f64,
}

impl TimerOptions {
    /// Options for a timer of `duration` seconds with the default tick period
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }

    /// Reject options the machine cannot start from
    pub fn validate(&self) -> Result<(), TimerError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(TimerError::InvalidDuration(self.duration));
        }
        self.tick_period().map(|_| ())
    }

    /// The tick interval as a `Duration`. It must be representable and must
    /// not round down to zero.
    pub fn tick_period(&self) -> Result<Duration, TimerError> {
        Duration::try_from_secs_f64(self.interval)
            .ok()
            .filter(|period| !period.is_zero())
            .ok_or(TimerError::InvalidInterval(self.interval))
    }
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "countdown-engine")]
#[command(about = "A countdown timer controlled over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: f64,

    /// Tick interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL)]
    pub interval: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn timer_options(&self) -> TimerOptions {
        TimerOptions::new(self.duration).with_interval(self.interval)
    }
}
