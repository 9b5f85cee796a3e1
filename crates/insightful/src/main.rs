//! Insightful CLI binary.
//!
//! Exports one project's per-employee app and website usage to CSV:
//! - Resolve the project and the date window
//! - Fetch the roster, then every member's usage in rate-limited batches
//! - Write the CSV and persist the response cache

use clap::Parser;
use insightful::InsightfulConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, list_projects, run_export};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = InsightfulConfig::load_with(cli.config.as_deref())?;

    if cli.list_projects {
        list_projects(&config.projects);
        return Ok(());
    }

    run_export(&cli, config).await?;

    Ok(())
}
