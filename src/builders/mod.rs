//! Builders to construct limiters from settings.

pub mod limiter_builder;

pub use limiter_builder::RateLimiterBuilder;
