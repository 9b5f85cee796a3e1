//! Cache keys for analytics queries.

use crate::TimeWindow;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Identity of one analytics query.
///
/// Two queries with identical tuples are the same request. The `Display`
/// encoding `"{employee}_{project}_{start}_{end}"` is the stable string form
/// used as the response cache key.
///
/// # Examples
///
/// ```
/// use insightful_core::{TimeWindow, UsageQueryKey};
///
/// let window = TimeWindow::new(1000, 2000).unwrap();
/// let key = UsageQueryKey::new("emp-1", "proj-a", &window);
/// assert_eq!(key.to_string(), "emp-1_proj-a_1000_2000");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Getters,
    derive_more::Display,
)]
#[display("{}_{}_{}_{}", employee_id, project_id, start_ms, end_ms)]
pub struct UsageQueryKey {
    employee_id: String,
    project_id: String,
    #[getter(copy)]
    start_ms: i64,
    #[getter(copy)]
    end_ms: i64,
}

impl UsageQueryKey {
    /// Build the key for an (employee, project, window) query.
    pub fn new(
        employee_id: impl Into<String>,
        project_id: impl Into<String>,
        window: &TimeWindow,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            start_ms: window.start_ms(),
            end_ms: window.end_ms(),
        }
    }

    /// Query parameters for `GET /api/v1/analytics/app`.
    pub fn query_params(&self) -> [(&'static str, String); 4] {
        [
            ("employeeId", self.employee_id.clone()),
            ("projectId", self.project_id.clone()),
            ("start", self.start_ms.to_string()),
            ("end", self.end_ms.to_string()),
        ]
    }
}
