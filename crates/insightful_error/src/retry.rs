//! Retry classification.

/// Trait for errors that support retry logic.
///
/// Transient failures like 503 (service unavailable), 429 (rate limit),
/// or network timeouts should return true. Failures that will repeat
/// identically on the next attempt, like an undecodable body, return false.
///
/// # Examples
///
/// ```
/// use insightful_error::{HttpError, HttpErrorKind, RetryableError};
///
/// let err = HttpError::new(HttpErrorKind::Decode("expected value".to_string()));
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}
