//! Command-line interface module.
//!
//! This module provides the CLI structure and the export handler for the insightful binary.

mod commands;
mod run;

pub use commands::Cli;
pub use run::{list_projects, run_export};
