//! Usage fetching and batch orchestration.
//!
//! - [`UsageSource`] is the seam the dispatcher fetches through
//! - [`UsageFetcher`] implements it against `GET /api/v1/analytics/app`,
//!   consulting the shared [`ResponseCache`](insightful_cache::ResponseCache)
//! - [`EmployeeDirectory`] fetches the roster
//! - [`BatchDispatcher`] walks a project's members in bounded parallel batches

#![warn(missing_docs)]

mod dispatcher;
mod fetcher;
mod report;
mod roster;
mod source;

pub use dispatcher::BatchDispatcher;
pub use fetcher::{ANALYTICS_APP_PATH, UsageFetcher};
pub use report::{BatchReport, DispatchReport};
pub use roster::{EMPLOYEE_PATH, EmployeeDirectory};
pub use source::{ApiEndpoint, UsageSource};
