//! Error types for limiter operations.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by the leaky bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    /// No free slot was granted within the configured timeout. The timed-out
    /// request is removed from the wait queue without consuming a slot.
    #[error("timed out after {0:?} waiting for a free slot")]
    AcquireTimeout(Duration),
    /// The bucket's coordination task has shut down.
    #[error("bucket closed")]
    Closed,
}

/// Errors surfaced by [`RequestRateLimiter::submit`].
///
/// `E` is the submitting work unit's own error type, propagated verbatim.
///
/// [`RequestRateLimiter::submit`]: crate::core::RequestRateLimiter::submit
#[derive(Debug, Error)]
pub enum LimiterError<E> {
    /// Slot acquisition failed; see [`BucketError`].
    #[error(transparent)]
    Bucket(#[from] BucketError),
    /// The work unit failed with its own error, passed through unchanged.
    #[error("{0}")]
    Handler(E),
    /// The work unit kept signalling backoff past the configured retry cap.
    #[error("backoff retry limit of {limit} exceeded")]
    RetryLimitExceeded {
        /// The configured `max_retries` value that was exhausted.
        limit: u32,
    },
}

/// Raised when limiter construction is given invalid settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid limiter configuration: {0}")]
pub struct ConfigError(
    /// Description of the first invalid setting.
    pub String,
);

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
