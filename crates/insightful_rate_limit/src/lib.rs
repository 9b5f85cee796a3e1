//! Rate limiting, retrying HTTP access and configuration.
//!
//! This crate owns every outgoing request to the Insightful API:
//! - [`RateLimiter`] enforces a minimum spacing between grants across all callers
//! - [`RetryingClient`] issues GETs through the limiter, retrying transient
//!   failures with exponential backoff plus jitter and honoring `Retry-After`
//! - [`InsightfulConfig`] loads layered TOML/environment configuration

mod client;
mod config;
mod limiter;

pub use client::{MAX_BACKOFF, RetryPolicy, RetryingClient};
pub use config::{ApiConfig, BatchConfig, CacheSettings, InsightfulConfig, RateLimitConfig};
pub use limiter::RateLimiter;
