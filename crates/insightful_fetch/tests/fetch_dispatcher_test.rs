//! Tests for batch dispatch using scripted usage sources.

use async_trait::async_trait;
use insightful_cache::ResponseCache;
use insightful_core::{
    AppUsage, Employee, NO_APPS_SENTINEL, NO_USAGE_SENTINEL, Project, TimeWindow, UsageResult,
};
use insightful_fetch::{BatchDispatcher, UsageSource};
use insightful_rate_limit::BatchConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const PROJECT_ID: &str = "proj-a";

fn employees(count: usize) -> Vec<Employee> {
    (0..count)
        .map(|i| {
            Employee::new(
                format!("emp-{i}"),
                format!("Employee {i}"),
                format!("emp{i}@example.com"),
                vec![PROJECT_ID.to_string()],
            )
        })
        .collect()
}

fn project() -> Project {
    Project::new(PROJECT_ID, "Guppy")
}

fn window() -> TimeWindow {
    TimeWindow::new(1_000, 2_000).unwrap()
}

fn config(max_workers: usize, batch_size: usize, batch_delay_secs: f64) -> BatchConfig {
    BatchConfig {
        max_workers,
        batch_size,
        batch_delay_secs,
    }
}

/// Records call start times and how many fetches overlap.
#[derive(Default)]
struct RecordingSource {
    starts: Mutex<Vec<Instant>>,
    active: AtomicUsize,
    peak: AtomicUsize,
    work: Duration,
}

impl RecordingSource {
    fn with_work(work: Duration) -> Self {
        Self {
            work,
            ..Self::default()
        }
    }
}

#[async_trait]
impl UsageSource for RecordingSource {
    async fn fetch(
        &self,
        employee_id: &str,
        _project_id: &str,
        _window: &TimeWindow,
        _cache: &ResponseCache,
    ) -> UsageResult {
        self.starts.lock().unwrap().push(Instant::now());
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.work).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        UsageResult::from_apps(vec![AppUsage::new(employee_id, 1)])
    }
}

/// Fails for every employee whose numeric suffix is odd, panics for "emp-3".
struct FlakySource;

#[async_trait]
impl UsageSource for FlakySource {
    async fn fetch(
        &self,
        employee_id: &str,
        _project_id: &str,
        _window: &TimeWindow,
        _cache: &ResponseCache,
    ) -> UsageResult {
        if employee_id == "emp-3" {
            panic!("boom");
        }
        let n: usize = employee_id.trim_start_matches("emp-").parse().unwrap();
        if n % 2 == 1 {
            UsageResult::unavailable("HTTP 500")
        } else {
            UsageResult::from_body(&serde_json::json!([])).unwrap()
        }
    }
}

fn dispatcher<S: UsageSource + 'static>(source: Arc<S>, config: BatchConfig) -> BatchDispatcher<S> {
    BatchDispatcher::new(source, Arc::new(ResponseCache::new()), config)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_twelve_employees_make_three_batches_with_two_pauses() {
    let source = Arc::new(RecordingSource::default());
    let dispatcher = dispatcher(source.clone(), config(10, 5, 0.3));

    let started = Instant::now();
    let report = dispatcher
        .run_detailed(&employees(12), &project(), &window())
        .await;
    let elapsed = started.elapsed();

    let sizes: Vec<usize> = report.batches().iter().map(|b| b.size()).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    let processed: Vec<usize> = report.batches().iter().map(|b| b.processed()).collect();
    assert_eq!(processed, vec![5, 10, 12]);
    assert_eq!(report.records().len(), 12);
    assert!(elapsed >= Duration::from_millis(600), "expected two pauses, took {elapsed:?}");
    assert!(elapsed < Duration::from_millis(900), "pause after final batch? took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_batch_has_no_pause() {
    let source = Arc::new(RecordingSource::default());
    let dispatcher = dispatcher(source, config(5, 5, 1.0));

    let started = Instant::now();
    let records = dispatcher.run(&employees(3), &project(), &window()).await;

    assert_eq!(records.len(), 3);
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_capped_by_max_workers() {
    let source = Arc::new(RecordingSource::with_work(Duration::from_millis(50)));
    let dispatcher = dispatcher(source.clone(), config(2, 6, 0.0));

    let records = dispatcher.run(&employees(6), &project(), &window()).await;

    assert_eq!(records.len(), 6);
    assert_eq!(source.peak.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_starts_after_previous_batch_finishes() {
    let source = Arc::new(RecordingSource::with_work(Duration::from_millis(80)));
    let dispatcher = dispatcher(source.clone(), config(5, 2, 0.0));

    dispatcher.run(&employees(4), &project(), &window()).await;

    let mut starts = source.starts.lock().unwrap().clone();
    starts.sort();
    assert_eq!(starts.len(), 4);
    assert!(starts[2].duration_since(starts[1]) >= Duration::from_millis(80));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_and_panics_still_yield_one_record_each() {
    let dispatcher = dispatcher(Arc::new(FlakySource), config(3, 4, 0.0));

    let report = dispatcher
        .run_detailed(&employees(8), &project(), &window())
        .await;

    assert_eq!(report.records().len(), 8);
    let ids: HashSet<&str> = report.records().iter().map(|r| r.employee_id().as_str()).collect();
    assert_eq!(ids.len(), 8);

    for record in report.records() {
        assert_eq!(record.apps(), NO_APPS_SENTINEL);
        assert_eq!(record.usage(), NO_USAGE_SENTINEL);
    }

    let failed: usize = report.batches().iter().map(|b| b.failed()).sum();
    let empty: usize = report.batches().iter().map(|b| b.empty()).sum();
    assert_eq!(failed, 4);
    assert_eq!(empty, 4);
}

#[tokio::test]
async fn test_non_members_are_filtered_out() {
    let mut roster = employees(3);
    roster.push(Employee::new("outsider", "Out", "", vec!["proj-b".to_string()]));
    let dispatcher = dispatcher(Arc::new(RecordingSource::default()), config(5, 5, 0.0));

    let records = dispatcher.run(&roster, &project(), &window()).await;

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.employee_id() != "outsider"));
    assert!(records.iter().all(|r| r.project_name() == "Guppy"));
}

#[tokio::test]
async fn test_no_members_returns_empty() {
    let source = Arc::new(RecordingSource::default());
    let dispatcher = dispatcher(source.clone(), config(5, 5, 0.0));
    let project = Project::new("proj-none", "Nobody");

    let report = dispatcher.run_detailed(&employees(4), &project, &window()).await;

    assert!(report.records().is_empty());
    assert!(report.batches().is_empty());
    assert!(source.starts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_sizes_are_clamped() {
    let dispatcher = dispatcher(Arc::new(RecordingSource::default()), config(0, 0, 0.0));
    assert_eq!(dispatcher.config().max_workers, 1);
    assert_eq!(dispatcher.config().batch_size, 1);

    let report = dispatcher.run_detailed(&employees(3), &project(), &window()).await;
    assert_eq!(report.batches().len(), 3);
}

#[tokio::test]
async fn test_records_carry_fetched_usage() {
    let dispatcher = dispatcher(Arc::new(RecordingSource::default()), config(5, 5, 0.0));

    let records = dispatcher.run(&employees(1), &project(), &window()).await;

    assert_eq!(records[0].apps(), r#"["emp-0"]"#);
    assert_eq!(records[0].usage(), "[1]");
    assert!(records[0].has_data());
}
