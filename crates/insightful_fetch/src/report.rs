//! Dispatch tallies.

use derive_getters::Getters;
use insightful_core::{EmployeeUsageRecord, UsageResult};

/// Outcome counts for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct BatchReport {
    #[getter(copy)]
    index: usize,
    #[getter(copy)]
    size: usize,
    #[getter(copy)]
    with_data: usize,
    #[getter(copy)]
    empty: usize,
    #[getter(copy)]
    failed: usize,
    /// Employees processed through the end of this batch
    #[getter(copy)]
    processed: usize,
}

impl BatchReport {
    /// Tally the records of batch `index`.
    pub fn tally(index: usize, records: &[EmployeeUsageRecord]) -> Self {
        let mut report = Self {
            index,
            size: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.result() {
                UsageResult::HasData { .. } => report.with_data += 1,
                result if result.is_retry_worthwhile() => report.failed += 1,
                _ => report.empty += 1,
            }
        }
        report
    }

    /// Percentage of the batch that returned data.
    pub fn success_rate(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.with_data as f64 / self.size as f64 * 100.0
        }
    }
}

/// Everything one dispatch produced.
#[derive(Debug, Clone, PartialEq, Default, Getters)]
pub struct DispatchReport {
    records: Vec<EmployeeUsageRecord>,
    batches: Vec<BatchReport>,
}

impl DispatchReport {
    pub(crate) fn push_batch(
        &mut self,
        records: Vec<EmployeeUsageRecord>,
        mut report: BatchReport,
    ) -> usize {
        self.records.extend(records);
        report.processed = self.records.len();
        self.batches.push(report);
        report.processed
    }

    /// Take the records, discarding the tallies.
    pub fn into_records(self) -> Vec<EmployeeUsageRecord> {
        self.records
    }

    /// Records that carry usage data.
    pub fn with_data(&self) -> usize {
        self.batches.iter().map(BatchReport::with_data).sum()
    }
}
