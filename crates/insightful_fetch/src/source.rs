//! Fetch seam and API location.

use async_trait::async_trait;
use insightful_cache::ResponseCache;
use insightful_core::{TimeWindow, UsageResult};
use insightful_error::ValidationError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Anything that can produce the usage outcome for one employee.
///
/// Implementations never fail: every problem is folded into
/// [`UsageResult::NoData`].
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Usage of `employee_id` in `project_id` over `window`.
    async fn fetch(
        &self,
        employee_id: &str,
        project_id: &str,
        window: &TimeWindow,
        cache: &ResponseCache,
    ) -> UsageResult;
}

/// Base URL and bearer credentials for the Insightful API.
///
/// # Example
///
/// ```
/// use insightful_fetch::ApiEndpoint;
///
/// let endpoint = ApiEndpoint::new("https://app.insightful.io/", "secret").unwrap();
/// assert_eq!(endpoint.url("/api/v1/employee"), "https://app.insightful.io/api/v1/employee");
/// assert!(ApiEndpoint::new("https://app.insightful.io", "bad\ntoken").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    base_url: String,
    headers: HeaderMap,
}

impl ApiEndpoint {
    /// Create an endpoint authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be sent as a header value.
    #[track_caller]
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self, ValidationError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ValidationError::new(format!("Invalid API token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
