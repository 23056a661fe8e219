//! Core admission-control types: bucket, limiter, handler contract, errors.

pub mod bucket;
pub mod error;
pub mod handler;
pub mod limiter;

pub use bucket::LeakyBucket;
pub use error::{AppResult, BucketError, ConfigError, LimiterError};
pub use handler::{Outcome, RequestHandler};
pub use limiter::RequestRateLimiter;
