//! Error types for the Insightful usage export workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind (or a message) with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use insightful_error::{InsightfulResult, HttpError, HttpErrorKind};
//!
//! fn fetch_roster() -> InsightfulResult<String> {
//!     Err(HttpError::new(HttpErrorKind::Transport("connection refused".to_string())))?
//! }
//!
//! assert!(fetch_roster().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod export;
mod http;
mod json;
mod retry;
mod validation;

pub use cache::{CacheError, CacheErrorKind};
pub use config::ConfigError;
pub use error::{InsightfulError, InsightfulErrorKind, InsightfulResult};
pub use export::ExportError;
pub use http::{HttpError, HttpErrorKind, HttpResult};
pub use json::JsonError;
pub use retry::RetryableError;
pub use validation::ValidationError;
