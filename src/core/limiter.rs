//! Rate limiter: admission control plus transparent backoff retry.

use std::time::Duration;

use crate::config::RateLimiterConfig;
use crate::core::bucket::LeakyBucket;
use crate::core::error::{ConfigError, LimiterError};
use crate::core::handler::{Outcome, RequestHandler};

/// Throttles submitted work units against a [`LeakyBucket`] and retries units
/// that signal transient overload.
///
/// Each limiter explicitly owns its bucket; independent limiters never share
/// admission state. Per submission the limiter acquires one slot, executes
/// the unit, and branches on the [`Outcome`]: success and fatal errors pass
/// through unchanged, while backoff pauses the bucket globally and re-enters
/// the same unit once the pause elapses. Callers never observe the backoff
/// signal itself.
///
/// # Example
///
/// ```rust,ignore
/// use prometheus_rate_limiter::{Outcome, RequestRateLimiter};
///
/// let limiter = RequestRateLimiter::new();
/// let value = limiter
///     .submit(|| async { Outcome::<_, std::io::Error>::Success(42) })
///     .await?;
/// assert_eq!(value, 42);
/// ```
pub struct RequestRateLimiter {
    bucket: LeakyBucket,
    backoff_time: Duration,
    max_retries: Option<u32>,
}

impl RequestRateLimiter {
    /// Create a limiter with the default configuration (60 slots per 60
    /// seconds, 600 second acquisition timeout, 10 second backoff pause,
    /// unbounded retries).
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let config = RateLimiterConfig::default();
        Self {
            bucket: LeakyBucket::new(
                config.request_rate as usize,
                config.interval(),
                config.timeout(),
            ),
            backoff_time: config.backoff_time(),
            max_retries: config.max_retries,
        }
    }

    /// Create a limiter from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration fails validation.
    pub fn from_config(config: &RateLimiterConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError)?;
        Ok(Self {
            bucket: LeakyBucket::new(
                config.request_rate as usize,
                config.interval(),
                config.timeout(),
            ),
            backoff_time: config.backoff_time(),
            max_retries: config.max_retries,
        })
    }

    /// Submit one work unit for rate-limited execution.
    ///
    /// Suspends until a slot is granted, then executes the unit. On
    /// [`Outcome::Backoff`] the bucket is paused for the configured backoff
    /// time and the same unit is retried with a fresh acquisition (and a
    /// fresh acquisition timeout window). Retries are unbounded unless
    /// `max_retries` is configured.
    ///
    /// # Errors
    ///
    /// - [`LimiterError::Bucket`] when no slot is granted within the
    ///   acquisition timeout of the attempt that timed out.
    /// - [`LimiterError::Handler`] carrying the unit's own error, unchanged.
    ///   The slot consumed by the failed attempt is not reclaimed early; it
    ///   decays on the next interval tick.
    /// - [`LimiterError::RetryLimitExceeded`] when a configured retry cap is
    ///   exhausted. No further pause is issued for the rejected signal.
    pub async fn submit<T, E, H>(&self, mut handler: H) -> Result<T, LimiterError<E>>
    where
        H: RequestHandler<T, E>,
        T: Send,
        E: Send,
    {
        let mut retries: u32 = 0;
        loop {
            self.bucket.acquire().await?;
            match handler.execute().await {
                Outcome::Success(value) => {
                    if retries > 0 {
                        tracing::debug!(retries, "request succeeded after backoff");
                    }
                    return Ok(value);
                }
                Outcome::Backoff(reason) => {
                    if let Some(limit) = self.max_retries {
                        if retries >= limit {
                            tracing::warn!(limit, "backoff retry budget exhausted");
                            return Err(LimiterError::RetryLimitExceeded { limit });
                        }
                    }
                    retries += 1;
                    tracing::debug!(
                        retries,
                        reason = reason.as_deref().unwrap_or("unspecified"),
                        "backoff signalled; pausing admission"
                    );
                    self.bucket.pause(self.backoff_time);
                }
                Outcome::Fatal(error) => return Err(LimiterError::Handler(error)),
            }
        }
    }

    /// Resolves when no work is outstanding or queued.
    ///
    /// One-shot: a completed call must be re-invoked to observe the next
    /// idle transition.
    pub async fn idle(&self) {
        self.bucket.await_empty().await;
    }

    /// The limiter's underlying bucket, for state introspection.
    #[must_use]
    pub const fn bucket(&self) -> &LeakyBucket {
        &self.bucket
    }
}

impl Default for RequestRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
