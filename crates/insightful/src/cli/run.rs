//! Export command handler.

use super::Cli;
use insightful::export::{default_output_name, write_csv};
use insightful::window::{DATE_FORMAT, date_window, format_local, lookback_window};
use insightful::{
    ApiEndpoint, BatchDispatcher, EmployeeDirectory, InsightfulConfig, InsightfulResult, Project,
    ProjectDirectory, RateLimiter, ResponseCache, RetryPolicy, RetryingClient, TimeWindow,
    UsageFetcher, ValidationError,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Print the configured projects, sorted by name.
pub fn list_projects(projects: &ProjectDirectory) {
    println!("Available projects:");
    for project in projects.projects() {
        println!("  {} (ID: {})", project.name(), project.id());
    }
}

/// Run one export: resolve inputs, fetch the roster, dispatch, write CSV.
///
/// # Errors
///
/// Returns an error for a missing or unknown project, an invalid date range,
/// a roster failure or an empty roster, and an output write failure.
pub async fn run_export(cli: &Cli, mut config: InsightfulConfig) -> InsightfulResult<()> {
    let started = Instant::now();

    apply_overrides(cli, &mut config);
    info!(
        delay_secs = config.rate_limit.request_delay_secs,
        "Setting individual API request delay"
    );
    info!(
        batch_size = config.batch.batch_size,
        batch_delay_secs = config.batch.batch_delay_secs,
        "Batch settings"
    );

    let project = resolve_project(cli, &config.projects)?;
    let window = resolve_window(cli)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output_name(&project, &window)));

    let cache = Arc::new(if config.cache.enabled {
        ResponseCache::load_from(&config.cache.file).await
    } else {
        ResponseCache::new()
    });

    let endpoint = ApiEndpoint::new(&config.api.base_url, config.api_token()?)?;
    let limiter = Arc::new(RateLimiter::new(config.rate_limit.request_delay()));
    let client = Arc::new(RetryingClient::new(
        limiter,
        RetryPolicy::from(&config.rate_limit),
    )?);

    let employees = EmployeeDirectory::fetch_all(&client, &endpoint).await?;
    if employees.is_empty() {
        return Err(ValidationError::new("No employee data found").into());
    }

    let fetcher = Arc::new(UsageFetcher::new(client, endpoint));
    let dispatcher = BatchDispatcher::new(fetcher, Arc::clone(&cache), config.batch.clone());
    let records = dispatcher.run(&employees, &project, &window).await;

    if records.is_empty() {
        println!("No data found for any employees in the specified project");
        return Ok(());
    }

    write_csv(&output, &records)?;

    if config.cache.enabled {
        cache.save_to(&config.cache.file).await;
    }

    println!("Data export complete! Saved to {}", output.display());
    println!(
        "Processed data for {} employees in project {}",
        records.len(),
        project.name()
    );
    println!(
        "Date range: {} to {}",
        format_local(window.start_ms(), DATE_FORMAT),
        format_local(window.end_ms(), DATE_FORMAT)
    );
    println!("Execution time: {:.2} seconds", started.elapsed().as_secs_f64());

    Ok(())
}

/// Layer command-line settings over the loaded configuration.
fn apply_overrides(cli: &Cli, config: &mut InsightfulConfig) {
    if let Some(threads) = cli.threads {
        config.batch.max_workers = threads;
    }
    if let Some(delay) = cli.delay {
        config.rate_limit.request_delay_secs = delay;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch.batch_size = batch_size;
    }
    if let Some(batch_delay) = cli.batch_delay {
        config.batch.batch_delay_secs = batch_delay;
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }
    if let Some(cache_file) = &cli.cache_file {
        config.cache.file = cache_file.clone();
    }
}

/// Pick the target project from `--project-id` or `--project`.
fn resolve_project(cli: &Cli, projects: &ProjectDirectory) -> Result<Project, ValidationError> {
    if let Some(id) = &cli.project_id {
        if !projects.contains(id) {
            warn!(project_id = %id, "Project ID not found in mapping, using ID as name");
        }
        return Ok(projects.resolve(id));
    }

    if let Some(name) = &cli.project {
        return projects.find_by_name(name).ok_or_else(|| {
            ValidationError::new(format!(
                "Project '{}' not found in mapping. Use --list-projects to see available projects.",
                name
            ))
        });
    }

    Err(ValidationError::new(
        "Either --project or --project-id must be specified. Use --list-projects to see available projects.",
    ))
}

fn resolve_window(cli: &Cli) -> Result<TimeWindow, ValidationError> {
    match (&cli.start_date, &cli.end_date) {
        (Some(start), Some(end)) => date_window(start, end),
        _ => {
            let window = lookback_window(cli.days, chrono::Local::now())?;
            println!(
                "Using default date range: {} to {}",
                format_local(window.start_ms(), DATE_FORMAT),
                format_local(window.end_ms(), DATE_FORMAT)
            );
            Ok(window)
        }
    }
}
