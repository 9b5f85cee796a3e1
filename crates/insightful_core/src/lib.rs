//! Core data types for the Insightful usage export tools.
//!
//! This crate provides the data model shared by the fetch, cache and export
//! layers: employees from the roster, projects, query windows, cache keys,
//! and the per-employee usage outcome.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod employee;
mod project;
mod query;
mod record;
mod usage;
mod window;

pub use employee::Employee;
pub use project::{Project, ProjectDirectory};
pub use query::UsageQueryKey;
pub use record::{EmployeeUsageRecord, NO_APPS_SENTINEL, NO_USAGE_SENTINEL};
pub use usage::{AppUsage, NoDataReason, UsageResult};
pub use window::{MILLIS_PER_DAY, TimeWindow};
