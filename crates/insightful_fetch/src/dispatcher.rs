//! Batched, bounded-parallel fetching for one project.
//!
//! Members of the project are split into consecutive batches. Within a batch
//! one task per employee runs on a [`JoinSet`], with a [`Semaphore`] capping
//! how many fetch at once. Batches run strictly one after another with a
//! pause in between.

use crate::{BatchReport, DispatchReport, UsageSource};
use futures::FutureExt;
use insightful_cache::ResponseCache;
use insightful_core::{Employee, EmployeeUsageRecord, Project, TimeWindow, UsageResult};
use insightful_rate_limit::BatchConfig;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

/// Runs a project's employees through a [`UsageSource`] in batches.
///
/// The returned records always number exactly the project's members: a
/// worker that panics still yields a no-data record for its employee.
/// Within a batch, records appear in completion order.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = BatchDispatcher::new(Arc::new(fetcher), cache, config.batch.clone());
/// let records = dispatcher.run(&employees, &project, &window).await;
/// ```
#[derive(Debug)]
pub struct BatchDispatcher<S> {
    source: Arc<S>,
    cache: Arc<ResponseCache>,
    config: BatchConfig,
}

impl<S> BatchDispatcher<S>
where
    S: UsageSource + 'static,
{
    /// Create a dispatcher. Worker and batch sizes below one are raised to one.
    pub fn new(source: Arc<S>, cache: Arc<ResponseCache>, mut config: BatchConfig) -> Self {
        config.max_workers = config.max_workers.max(1);
        config.batch_size = config.batch_size.max(1);
        Self {
            source,
            cache,
            config,
        }
    }

    /// Batching in effect.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Records for every member of `project`.
    pub async fn run(
        &self,
        employees: &[Employee],
        project: &Project,
        window: &TimeWindow,
    ) -> Vec<EmployeeUsageRecord> {
        self.run_detailed(employees, project, window)
            .await
            .into_records()
    }

    /// Records for every member of `project`, with per-batch tallies.
    #[instrument(skip(self, employees, project, window), fields(project = %project))]
    pub async fn run_detailed(
        &self,
        employees: &[Employee],
        project: &Project,
        window: &TimeWindow,
    ) -> DispatchReport {
        let members: Vec<&Employee> = employees
            .iter()
            .filter(|e| e.belongs_to(project.id()))
            .collect();

        let mut report = DispatchReport::default();
        if members.is_empty() {
            warn!(project_id = %project.id(), "No employees found for project");
            return report;
        }

        let batch_count = members.len().div_ceil(self.config.batch_size);
        info!(
            employees = members.len(),
            batches = batch_count,
            batch_size = self.config.batch_size,
            "Processing employees in batches"
        );

        for (index, batch) in members.chunks(self.config.batch_size).enumerate() {
            info!(batch = index + 1, of = batch_count, size = batch.len(), "Processing batch");

            let records = self.run_batch(batch, project, window).await;
            let tally = BatchReport::tally(index, &records);
            info!(
                batch = index + 1,
                with_data = tally.with_data(),
                empty = tally.empty(),
                failed = tally.failed(),
                success_rate = %format!("{:.1}%", tally.success_rate()),
                "Batch complete"
            );
            let processed = report.push_batch(records, tally);
            info!(
                progress = %format!("{}/{}", processed, members.len()),
                "Processing employees"
            );

            if index + 1 < batch_count && !self.config.batch_delay().is_zero() {
                info!(
                    delay_secs = self.config.batch_delay_secs,
                    "Waiting before next batch"
                );
                tokio::time::sleep(self.config.batch_delay()).await;
            }
        }

        info!(
            records = report.records().len(),
            with_data = report.with_data(),
            "Dispatch finished"
        );
        report
    }

    async fn run_batch(
        &self,
        batch: &[&Employee],
        project: &Project,
        window: &TimeWindow,
    ) -> Vec<EmployeeUsageRecord> {
        let permits = Arc::new(Semaphore::new(self.config.max_workers.min(batch.len())));
        let mut tasks = JoinSet::new();

        for (slot, employee) in batch.iter().enumerate() {
            let employee = (*employee).clone();
            let project = project.clone();
            let window = *window;
            let source = Arc::clone(&self.source);
            let cache = Arc::clone(&self.cache);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                // Closed only if the semaphore is dropped, which cannot happen while tasks hold it
                let _permit = permits.acquire_owned().await.ok();
                let fetch = source.fetch(employee.id(), project.id(), &window, &cache);
                let result = match AssertUnwindSafe(fetch).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => {
                        let reason = panic_message(&*panic);
                        error!(employee_id = %employee.id(), reason = %reason, "Worker panicked");
                        UsageResult::unavailable(format!("worker panicked: {}", reason))
                    }
                };
                (slot, EmployeeUsageRecord::new(&employee, &project, result))
            });
        }

        let mut records = Vec::with_capacity(batch.len());
        let mut finished = BTreeSet::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, record)) => {
                    finished.insert(slot);
                    records.push(record);
                }
                Err(e) => error!(error = %e, "Worker task failed"),
            }
        }

        // Any task lost outside the fetch still accounts for its employee
        for (slot, employee) in batch.iter().enumerate() {
            if !finished.contains(&slot) {
                records.push(EmployeeUsageRecord::new(
                    employee,
                    project,
                    UsageResult::unavailable("worker task failed"),
                ));
            }
        }

        records
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
