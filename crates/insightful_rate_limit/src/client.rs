//! Retrying HTTP GET through the shared rate limiter.
//!
//! Each attempt acquires the [`RateLimiter`] before sending. Failures are
//! classified into three paths:
//! - **429**: sleep for the server's `Retry-After` (or twice the request
//!   spacing) without advancing the backoff tier
//! - **other non-2xx / transport**: sleep `backoff_factor * 2^tier` seconds
//!   plus up to `jitter_ratio` of that, then advance the tier
//! - **2xx**: decode the JSON body and return it
//!
//! Every attempt, 429 or not, consumes the `retries` budget.

use crate::{RateLimitConfig, RateLimiter};
use derive_getters::Getters;
use insightful_error::{HttpError, HttpErrorKind, HttpResult, RetryableError};
use rand::Rng;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Upper bound on any single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(3600);

/// Attempt budget and backoff shape for [`RetryingClient`].
///
/// # Example
///
/// ```
/// use insightful_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .with_retries(5)
///     .with_backoff_factor(0.5);
///
/// assert_eq!(*policy.retries(), 5);
/// assert_eq!(*policy.timeout(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RetryPolicy {
    /// Total attempts, including the first
    retries: u32,
    /// Base backoff in seconds, doubled per tier
    backoff_factor: f64,
    /// Upper bound of random jitter as a fraction of the backoff
    jitter_ratio: f64,
    /// Per-request timeout
    timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff_factor: 1.0,
            jitter_ratio: 0.1,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&RateLimitConfig> for RetryPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            retries: config.retries,
            backoff_factor: config.backoff_factor,
            jitter_ratio: config.jitter_ratio,
            timeout: config.timeout(),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after a generic failure at `tier`,
    /// jitter included, capped at [`MAX_BACKOFF`].
    pub fn backoff_delay(&self, tier: u32) -> Duration {
        let factor = self.backoff_factor.max(0.0);
        if factor == 0.0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(tier).unwrap_or(i32::MAX);
        let base = factor * 2f64.powi(exponent);
        if !base.is_finite() || base >= MAX_BACKOFF.as_secs_f64() {
            return MAX_BACKOFF;
        }

        let max_jitter = base * self.jitter_ratio.max(0.0);
        let jitter = if max_jitter > 0.0 && max_jitter.is_finite() {
            rand::thread_rng().gen_range(0.0..max_jitter)
        } else {
            0.0
        };
        Duration::try_from_secs_f64(base + jitter)
            .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
    }
}

/// HTTP client that rate limits and retries every GET.
///
/// One `reqwest::Client` is built up front and reused for every call, so
/// connections are pooled across workers.
///
/// # Example
///
/// ```rust,ignore
/// use insightful_rate_limit::{RateLimiter, RetryPolicy, RetryingClient};
/// use reqwest::header::HeaderMap;
/// use std::sync::Arc;
///
/// let limiter = Arc::new(RateLimiter::default());
/// let client = RetryingClient::new(limiter, RetryPolicy::default())?;
/// let body = client.get("https://app.insightful.io/api/v1/employee", &HeaderMap::new(), &[]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RetryingClient {
    http: Client,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Create a client that acquires `limiter` before every attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized.
    #[instrument(skip_all)]
    pub fn new(limiter: Arc<RateLimiter>, policy: RetryPolicy) -> HttpResult<Self> {
        let http = Client::builder()
            .timeout(policy.timeout)
            .build()
            .map_err(|e| HttpError::new(HttpErrorKind::ClientBuild(e.to_string())))?;

        debug!(
            retries = policy.retries,
            backoff_factor = policy.backoff_factor,
            timeout_secs = policy.timeout.as_secs_f64(),
            "Created retrying client"
        );

        Ok(Self {
            http,
            limiter,
            policy,
        })
    }

    /// The limiter shared by this client.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issue one logical GET and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns the last failure once the attempt budget is exhausted, or
    /// immediately for failures that are not retryable (an undecodable
    /// success body).
    #[instrument(skip(self, headers, params))]
    pub async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &[(&str, String)],
    ) -> HttpResult<Value> {
        let attempts = self.policy.retries.max(1);
        let mut tier = 0u32;
        let mut last_error = None;

        for attempt in 0..attempts {
            let remaining = attempt + 1 < attempts;
            self.limiter.acquire().await;

            let error = match self.send_once(url, headers, params).await {
                Ok(Outcome::Body(body)) => return Ok(body),
                Ok(Outcome::RateLimited(wait)) => {
                    warn!(
                        attempt = attempt + 1,
                        attempts,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limited, waiting before retry"
                    );
                    if remaining {
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    HttpError::new(HttpErrorKind::RateLimited {
                        retry_after_secs: wait.as_secs(),
                    })
                }
                Err(e) => e,
            };

            if !error.is_retryable() {
                error!(error = %error, "Request failed with non-retryable error");
                return Err(error);
            }

            error!(attempt = attempt + 1, attempts, error = %error, "Request error");

            if remaining && !matches!(error.kind(), HttpErrorKind::RateLimited { .. }) {
                let delay = self.policy.backoff_delay(tier);
                tier += 1;
                info!(delay_secs = delay.as_secs_f64(), "Retrying after backoff");
                tokio::time::sleep(delay).await;
            }

            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| {
            HttpError::new(HttpErrorKind::Transport("no attempts were made".to_string()))
        }))
    }

    async fn send_once(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &[(&str, String)],
    ) -> HttpResult<Outcome> {
        let response = self
            .http
            .get(url)
            .headers(headers.clone())
            .query(params)
            .timeout(self.policy.timeout)
            .send()
            .await
            .map_err(|e| HttpError::new(HttpErrorKind::Transport(e.to_string())))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait = parse_retry_after(response.headers())
                .unwrap_or_else(|| self.limiter.min_interval() * 2);
            return Ok(Outcome::RateLimited(wait));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::new(HttpErrorKind::Status {
                status: status.as_u16(),
                message,
            }));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(HttpErrorKind::Transport(e.to_string())))?;

        let body = serde_json::from_slice(&bytes)
            .map_err(|e| HttpError::new(HttpErrorKind::Decode(e.to_string())))?;

        debug!(status = status.as_u16(), "Request succeeded");
        Ok(Outcome::Body(body))
    }
}

/// Result of one attempt that did not fail outright.
enum Outcome {
    Body(Value),
    RateLimited(Duration),
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
///
/// Values that do not fit a `Duration` are treated as absent.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs: f64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}
