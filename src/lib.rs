//! # Prometheus Rate Limiter
//!
//! A backoff-aware admission-control library for the Prometheus AI Platform.
//!
//! This library throttles arbitrary asynchronous work units against a leaky
//! bucket: a bounded number of slots is granted per interval, consumed slots
//! drain back automatically over time, and queued acquisitions are served in
//! strict arrival order. A [`RequestRateLimiter`] wraps the bucket and adds
//! transparent handling of transient-overload signals: when a work unit
//! reports backoff, admission is paused globally and the same unit is retried
//! once the pause elapses.
//!
//! ## Core Problem Solved
//!
//! Upstream AI services signal overload asynchronously: a request is accepted,
//! then the provider answers "slow down". Static admission windows cannot
//! react to that. The limiter here combines both directions:
//!
//! - **Leaky-bucket admission**: at most `request_rate` work units start per
//!   `interval`, smoothed over time rather than in fixed windows
//! - **Backoff pause**: a distinguished outcome from a work unit defers every
//!   queued and future grant uniformly, then retries the signalling unit
//! - **Idle notification**: a one-shot future that resolves when no work is
//!   outstanding or queued
//!
//! ## Example
//!
//! ```rust,ignore
//! use prometheus_rate_limiter::{Outcome, RateLimiterBuilder};
//! use std::time::Duration;
//!
//! let limiter = RateLimiterBuilder::new()
//!     .with_request_rate(60)
//!     .with_interval(Duration::from_secs(60))
//!     .with_backoff_time(Duration::from_secs(10))
//!     .build()?;
//!
//! let response = limiter
//!     .submit(|| async {
//!         match upstream_call().await {
//!             Ok(body) => Outcome::Success(body),
//!             Err(e) if e.is_throttled() => Outcome::backoff_with("upstream 429"),
//!             Err(e) => Outcome::Fatal(e),
//!         }
//!     })
//!     .await?;
//! ```
//!
//! Callers observe only the work unit's own result, the work unit's own
//! error, or an acquisition timeout; backoff is entirely transparent.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission-control types: bucket, limiter, handler contract, errors.
pub mod core;
/// Configuration models for rates, intervals, and retry budgets.
pub mod config;
/// Builders to construct limiters from settings.
pub mod builders;
/// Runtime adapters for spawning the bucket coordination task.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::builders::RateLimiterBuilder;
pub use crate::config::RateLimiterConfig;
pub use crate::core::{
    BucketError, ConfigError, LeakyBucket, LimiterError, Outcome, RequestHandler,
    RequestRateLimiter,
};
