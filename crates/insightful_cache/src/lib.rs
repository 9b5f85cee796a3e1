//! Analytics response caching.
//!
//! This crate provides the response cache shared by every worker in a run,
//! reducing API calls within a run and across repeated runs.

#![warn(missing_docs)]

mod cache;

pub use cache::ResponseCache;
