//! Insightful usage export.
//!
//! Fetches per-employee application and website usage from the Insightful
//! analytics API for one project and one time window, and writes it as CSV.
//!
//! # Features
//!
//! - **Rate Limiting**: every request is spaced through one shared limiter
//! - **Retries**: transient failures back off exponentially, `429` honors `Retry-After`
//! - **Caching**: raw responses are cached in memory and on disk across runs
//! - **Batching**: employees are fetched in bounded parallel batches
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use insightful::{
//!     ApiEndpoint, BatchDispatcher, EmployeeDirectory, InsightfulConfig, RateLimiter,
//!     ResponseCache, RetryPolicy, RetryingClient, UsageFetcher,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InsightfulConfig::load()?;
//!     let limiter = Arc::new(RateLimiter::new(config.rate_limit.request_delay()));
//!     let client = Arc::new(RetryingClient::new(limiter, RetryPolicy::from(&config.rate_limit))?);
//!     let endpoint = ApiEndpoint::new(&config.api.base_url, config.api_token()?)?;
//!
//!     let employees = EmployeeDirectory::fetch_all(&client, &endpoint).await?;
//!     let project = config.projects.resolve("wzx8dcze_04iuwk");
//!     let window = insightful::window::lookback_window(7, chrono::Local::now())?;
//!
//!     let fetcher = Arc::new(UsageFetcher::new(client, endpoint));
//!     let dispatcher = BatchDispatcher::new(fetcher, Arc::new(ResponseCache::new()), config.batch);
//!     let records = dispatcher.run(&employees, &project, &window).await;
//!     println!("{} records", records.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod export;
pub mod window;

pub use insightful_cache::ResponseCache;
pub use insightful_core::{
    AppUsage, Employee, EmployeeUsageRecord, MILLIS_PER_DAY, NO_APPS_SENTINEL, NO_USAGE_SENTINEL,
    NoDataReason, Project, ProjectDirectory, TimeWindow, UsageQueryKey, UsageResult,
};
pub use insightful_error::{
    CacheError, ConfigError, ExportError, HttpError, HttpErrorKind, InsightfulError,
    InsightfulErrorKind, InsightfulResult, JsonError, ValidationError,
};
pub use insightful_fetch::{
    ApiEndpoint, BatchDispatcher, BatchReport, DispatchReport, EmployeeDirectory, UsageFetcher,
    UsageSource,
};
pub use insightful_rate_limit::{
    ApiConfig, BatchConfig, CacheSettings, InsightfulConfig, RateLimitConfig, RateLimiter,
    RetryPolicy, RetryingClient,
};
