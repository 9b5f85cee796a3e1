//! Output records handed to the export stage.

use crate::{Employee, Project, UsageResult};
use derive_getters::Getters;
use serde::Serialize;

/// Placeholder for the `apps` column when there is no data.
pub const NO_APPS_SENTINEL: &str = "No data/No screenshots";

/// Placeholder for the `usage` column when there is no data.
pub const NO_USAGE_SENTINEL: &str = "No data";

/// One employee's usage for one project and window.
///
/// Serializes in the export column order
/// `employee_id, name, email, project_id, project_name, apps, usage`, where
/// `apps` and `usage` are JSON-encoded arrays or the no-data sentinels.
///
/// # Examples
///
/// ```
/// use insightful_core::{Employee, EmployeeUsageRecord, Project, UsageResult, NO_USAGE_SENTINEL};
///
/// let employee = Employee::new("e-1", "Ada", "ada@example.com", vec!["p".into()]);
/// let project = Project::new("p", "Guppy");
/// let record = EmployeeUsageRecord::new(&employee, &project, UsageResult::unavailable("timeout"));
///
/// assert_eq!(record.usage(), NO_USAGE_SENTINEL);
/// assert_eq!(record.project_name(), "Guppy");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct EmployeeUsageRecord {
    employee_id: String,
    name: String,
    email: String,
    project_id: String,
    project_name: String,
    apps: String,
    usage: String,
    #[serde(skip)]
    result: UsageResult,
}

impl EmployeeUsageRecord {
    /// Flatten `result` into a record for `employee` in `project`.
    pub fn new(employee: &Employee, project: &Project, result: UsageResult) -> Self {
        let (apps, usage) = match &result {
            UsageResult::HasData {
                app_names,
                usage_values,
            } => (
                serde_json::to_string(app_names).unwrap_or_else(|_| NO_APPS_SENTINEL.to_string()),
                serde_json::to_string(usage_values)
                    .unwrap_or_else(|_| NO_USAGE_SENTINEL.to_string()),
            ),
            UsageResult::NoData(_) => (NO_APPS_SENTINEL.to_string(), NO_USAGE_SENTINEL.to_string()),
        };

        Self {
            employee_id: employee.id().clone(),
            name: employee.name().clone(),
            email: employee.email().clone(),
            project_id: project.id().clone(),
            project_name: project.name().clone(),
            apps,
            usage,
            result,
        }
    }

    /// Whether the record carries usage data.
    pub fn has_data(&self) -> bool {
        self.result.has_data()
    }
}
