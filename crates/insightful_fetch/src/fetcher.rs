//! Per-employee usage retrieval with response caching.

use crate::{ApiEndpoint, UsageSource};
use async_trait::async_trait;
use insightful_cache::ResponseCache;
use insightful_core::{TimeWindow, UsageQueryKey, UsageResult};
use insightful_error::InsightfulResult;
use insightful_rate_limit::RetryingClient;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Analytics endpoint, relative to the API base URL.
pub const ANALYTICS_APP_PATH: &str = "/api/v1/analytics/app";

/// Fetches one employee's app usage, consulting the shared cache first.
///
/// Raw bodies are cached before they are interpreted, so a body that later
/// fails to parse is not requested again.
#[derive(Debug, Clone)]
pub struct UsageFetcher {
    client: Arc<RetryingClient>,
    endpoint: ApiEndpoint,
}

impl UsageFetcher {
    /// Create a fetcher issuing requests through `client`.
    pub fn new(client: Arc<RetryingClient>, endpoint: ApiEndpoint) -> Self {
        Self { client, endpoint }
    }

    /// The endpoint queried.
    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    async fn try_fetch(
        &self,
        key: &UsageQueryKey,
        cache: &ResponseCache,
    ) -> InsightfulResult<UsageResult> {
        let cache_key = key.to_string();

        let body = match cache.get(&cache_key).await {
            Some(body) => {
                debug!(key = %cache_key, "Using cached analytics response");
                body
            }
            None => {
                let url = self.endpoint.url(ANALYTICS_APP_PATH);
                let body = self
                    .client
                    .get(&url, self.endpoint.headers(), &key.query_params())
                    .await?;
                cache.put(cache_key, body.clone()).await;
                body
            }
        };

        Ok(UsageResult::from_body(&body)?)
    }
}

#[async_trait]
impl UsageSource for UsageFetcher {
    #[instrument(skip(self, window, cache))]
    async fn fetch(
        &self,
        employee_id: &str,
        project_id: &str,
        window: &TimeWindow,
        cache: &ResponseCache,
    ) -> UsageResult {
        let key = UsageQueryKey::new(employee_id, project_id, window);
        match self.try_fetch(&key, cache).await {
            Ok(result) => result,
            Err(e) => {
                error!(employee_id, error = %e, "Error fetching usage data");
                UsageResult::unavailable(e.to_string())
            }
        }
    }
}
