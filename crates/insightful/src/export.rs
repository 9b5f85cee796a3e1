//! CSV output of usage records.

use crate::window::format_local;
use insightful_core::{EmployeeUsageRecord, Project, TimeWindow};
use insightful_error::ExportError;
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument};

/// Default output file name for `project` over `window`.
///
/// The project name is lowercased with spaces replaced by underscores; the
/// dates are the local calendar days containing each bound.
///
/// ```
/// use insightful::export::default_output_name;
/// use insightful::{Project, TimeWindow};
///
/// let window = insightful::window::date_window("2024-02-01", "2024-02-07").unwrap();
/// let name = default_output_name(&Project::new("p1", "Data Science"), &window);
/// assert_eq!(name, "insightful_data_science_apps_20240201_to_20240207.csv");
/// ```
pub fn default_output_name(project: &Project, window: &TimeWindow) -> String {
    let safe_name = project.name().to_lowercase().replace(' ', "_");
    format!(
        "insightful_{}_apps_{}_to_{}.csv",
        safe_name,
        format_local(window.start_ms(), "%Y%m%d"),
        format_local(window.end_ms(), "%Y%m%d")
    )
}

/// Write `records` as CSV with a header row to `writer`.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized or written.
pub fn write_records<W: Write>(writer: W, records: &[EmployeeUsageRecord]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)
            .map_err(|e| ExportError::new(format!("Failed to write record: {}", e)))?;
    }
    csv.flush()
        .map_err(|e| ExportError::new(format!("Failed to flush output: {}", e)))
}

/// Write `records` as CSV to the file at `path`, replacing it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[instrument(skip(path, records), fields(path = %path.as_ref().display(), count = records.len()))]
pub fn write_csv(path: impl AsRef<Path>, records: &[EmployeeUsageRecord]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| {
        ExportError::new(format!("Failed to create {}: {}", path.display(), e))
    })?;
    write_records(file, records)?;
    debug!("CSV written");
    Ok(())
}
