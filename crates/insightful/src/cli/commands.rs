//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Fetch Insightful employee app usage data by project.
///
/// Use either --project to pick a project by name from the configured
/// mapping, or --project-id to give an identifier directly. Give both
/// --start-date and --end-date for a fixed range, or --days to look back
/// from now.
#[derive(Parser, Debug, Clone)]
#[command(name = "insightful")]
#[command(about = "Export per-employee app and website usage from Insightful", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project name from the mapping (e.g. "Guppy")
    #[arg(short, long, conflicts_with = "project_id")]
    pub project: Option<String>,

    /// Project identifier (e.g. "wzx8dcze_04iuwk")
    #[arg(long)]
    pub project_id: Option<String>,

    /// Output file (default: insightful_<project>_apps_<start>_to_<end>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the configured projects and exit
    #[arg(short, long)]
    pub list_projects: bool,

    /// Start date, YYYY-MM-DD
    #[arg(long, requires = "end_date")]
    pub start_date: Option<String>,

    /// End date, YYYY-MM-DD
    #[arg(long, requires = "start_date")]
    pub end_date: Option<String>,

    /// Days to look back when no dates are given
    #[arg(short, long, default_value_t = 7)]
    pub days: u32,

    /// Parallel workers per batch
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Delay between individual API requests, in seconds
    #[arg(long)]
    pub delay: Option<f64>,

    /// Employees per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Delay between batches, in seconds
    #[arg(long)]
    pub batch_delay: Option<f64>,

    /// Do not load or save the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Cache file location
    #[arg(long)]
    pub cache_file: Option<PathBuf>,

    /// Additional configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
