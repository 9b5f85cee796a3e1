//! Minimum-interval request spacing.
//!
//! A single "last grant" instant sits behind a Tokio mutex. Callers take
//! the lock only to check and update it; any waiting happens after the lock
//! is released, and the remaining wait is recomputed on every pass.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Global request spacing shared by every worker in a run.
///
/// Any two grants returned by [`acquire`](Self::acquire) are at least
/// `min_interval` apart, regardless of which task asked. No fairness between
/// waiting callers is promised.
///
/// # Example
///
/// ```rust,ignore
/// use insightful_rate_limit::RateLimiter;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(Duration::from_millis(500)));
/// limiter.acquire().await;
/// // issue request...
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter that spaces grants by `min_interval`.
    pub fn new(min_interval: Duration) -> Self {
        debug!(?min_interval, "Creating rate limiter");
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured spacing between grants.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Change the spacing. Requires exclusive access, so it can only happen
    /// before the limiter is shared for a run.
    pub fn set_min_interval(&mut self, min_interval: Duration) {
        self.min_interval = min_interval;
    }

    /// Wait until a request may be issued and return the grant instant.
    #[instrument(level = "trace", skip(self))]
    pub async fn acquire(&self) -> Instant {
        loop {
            let wait = {
                let mut last_grant = self.last_grant.lock().await;
                let now = Instant::now();
                match *last_grant {
                    Some(previous) if now.duration_since(previous) < self.min_interval => {
                        self.min_interval - now.duration_since(previous)
                    }
                    _ => {
                        *last_grant = Some(now);
                        return now;
                    }
                }
            };

            debug!(wait_secs = wait.as_secs_f64(), "Rate limiting: waiting");
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
