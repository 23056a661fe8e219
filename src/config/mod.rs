//! Configuration models for rates, intervals, and retry budgets.

pub mod limiter;

pub use limiter::RateLimiterConfig;
