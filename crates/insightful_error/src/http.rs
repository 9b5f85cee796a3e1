//! HTTP error types.

use crate::RetryableError;

/// Specific HTTP failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// Connection, timeout or body transfer failure
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Non-success status other than 429
    #[display("HTTP {} error: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// Server answered 429 on the final attempt
    #[display("Rate limited by server (retry after {}s)", retry_after_secs)]
    RateLimited {
        /// Wait the server asked for, in seconds
        retry_after_secs: u64,
    },
    /// Success status but the body was not valid JSON
    #[display("Failed to decode response body: {}", _0)]
    Decode(String),
    /// The underlying HTTP client could not be constructed
    #[display("Failed to build HTTP client: {}", _0)]
    ClientBuild(String),
}

impl HttpErrorKind {
    /// Check if this failure should trigger another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::Transport(_)
                | HttpErrorKind::Status { .. }
                | HttpErrorKind::RateLimited { .. }
        )
    }
}

/// HTTP error with source location tracking.
///
/// # Examples
///
/// ```
/// use insightful_error::{HttpError, HttpErrorKind, RetryableError};
///
/// let err = HttpError::new(HttpErrorKind::Status {
///     status: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    /// The kind of error that occurred
    pub kind: HttpErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HttpErrorKind {
        &self.kind
    }

    /// HTTP status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            HttpErrorKind::Status { status, .. } => Some(status),
            HttpErrorKind::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = std::result::Result<T, HttpError>;
