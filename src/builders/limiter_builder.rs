//! Fluent construction of a validated rate limiter.

use std::time::Duration;

use crate::config::RateLimiterConfig;
use crate::core::{ConfigError, RequestRateLimiter};

/// Builder for [`RequestRateLimiter`].
///
/// Starts from the default configuration; every setter overrides one field.
///
/// ```rust,ignore
/// use prometheus_rate_limiter::RateLimiterBuilder;
/// use std::time::Duration;
///
/// let limiter = RateLimiterBuilder::new()
///     .with_request_rate(30)
///     .with_interval(Duration::from_secs(10))
///     .with_max_retries(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiterBuilder {
    config: RateLimiterConfig,
}

impl RateLimiterBuilder {
    /// Builder seeded with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots granted per interval.
    #[must_use]
    pub const fn with_request_rate(mut self, request_rate: u32) -> Self {
        self.config.request_rate = request_rate;
        self
    }

    /// Interval over which consumed slots drain back.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.config.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Maximum wait per slot acquisition.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Pause applied when a work unit signals backoff.
    #[must_use]
    pub fn with_backoff_time(mut self, backoff_time: Duration) -> Self {
        self.config.backoff_ms = u64::try_from(backoff_time.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Cap backoff retries per submission. Unset, retries are unbounded.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = Some(max_retries);
        self
    }

    /// The settings accumulated so far.
    #[must_use]
    pub const fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Validate the settings and construct the limiter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the accumulated settings are invalid.
    pub fn build(self) -> Result<RequestRateLimiter, ConfigError> {
        RequestRateLimiter::from_config(&self.config)
    }
}
