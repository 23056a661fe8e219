//! Rate limiter configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Rate limiter configuration.
///
/// Every field has a default, so partial JSON documents deserialize with the
/// remaining fields filled in: 60 slots per 60 second interval, a 600 second
/// acquisition timeout, a 10 second backoff pause, and no retry cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Slots granted per interval.
    #[serde(default = "default_request_rate")]
    pub request_rate: u32,
    /// Interval over which consumed slots drain back, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Maximum wait per slot acquisition, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause applied when a work unit signals backoff, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Cap on backoff retries per submission. `None` retries indefinitely.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

const fn default_request_rate() -> u32 {
    60
}

const fn default_interval_ms() -> u64 {
    60_000
}

const fn default_timeout_ms() -> u64 {
    600_000
}

const fn default_backoff_ms() -> u64 {
    10_000
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            request_rate: default_request_rate(),
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            backoff_ms: default_backoff_ms(),
            max_retries: None,
        }
    }
}

impl RateLimiterConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_rate == 0 {
            return Err("request_rate must be greater than 0".into());
        }
        if self.interval_ms == 0 {
            return Err("interval_ms must be greater than 0".into());
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse limiter configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse failure or the first invalid field.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Drain interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Acquisition timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Backoff pause as a [`Duration`].
    #[must_use]
    pub const fn backoff_time(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}
