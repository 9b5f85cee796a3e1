//! Employee roster retrieval.

use crate::ApiEndpoint;
use insightful_core::Employee;
use insightful_error::{InsightfulResult, JsonError};
use insightful_rate_limit::RetryingClient;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Roster endpoint, relative to the API base URL.
pub const EMPLOYEE_PATH: &str = "/api/v1/employee";

/// Access to the organization's employee roster.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeDirectory;

impl EmployeeDirectory {
    /// Fetch every employee.
    ///
    /// Entries that do not describe an employee are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an array.
    #[instrument(skip_all)]
    pub async fn fetch_all(
        client: &RetryingClient,
        endpoint: &ApiEndpoint,
    ) -> InsightfulResult<Vec<Employee>> {
        let url = endpoint.url(EMPLOYEE_PATH);
        let body = client.get(&url, endpoint.headers(), &[]).await?;

        let Value::Array(entries) = body else {
            return Err(JsonError::new(format!(
                "expected employee array, got {}",
                json_type(&body)
            ))
            .into());
        };

        let total = entries.len();
        let employees: Vec<Employee> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(employee) => Some(employee),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed roster entry");
                    None
                }
            })
            .collect();

        info!(count = employees.len(), skipped = total - employees.len(), "Fetched employee roster");
        Ok(employees)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
