//! Roster entries.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "Unknown".to_string()
}

/// An employee as returned by `GET /api/v1/employee`.
///
/// Unknown fields in the roster payload are ignored.
///
/// # Examples
///
/// ```
/// use insightful_core::Employee;
/// use serde_json::json;
///
/// let employee: Employee = serde_json::from_value(json!({
///     "id": "emp-1",
///     "projects": ["proj-a"],
/// })).unwrap();
///
/// assert_eq!(employee.name(), "Unknown");
/// assert!(employee.belongs_to("proj-a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Employee {
    id: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    projects: Vec<String>,
}

impl Employee {
    /// Create an employee record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        projects: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            projects,
        }
    }

    /// Whether this employee is assigned to `project_id`.
    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.projects.iter().any(|p| p == project_id)
    }
}
