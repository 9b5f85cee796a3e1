//! Errors for API bodies that decode but do not have the expected shape.

/// A roster or analytics body with an unexpected shape.
///
/// Raised when the roster is not an array, or when an analytics record is
/// not an object, has a non-string `name` or a non-numeric `usage`. The usage
/// fetcher turns it into a no-data result; the roster fetch propagates it.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use insightful_error::JsonError;
    ///
    /// let err = JsonError::new("record 2 is not an object");
    /// assert!(err.message.contains("not an object"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InsightfulError, InsightfulErrorKind};

    #[test]
    fn test_shape_error_reports_location_and_converts() {
        let err = JsonError::new("expected employee array, got object");
        let shown = err.to_string();
        assert!(shown.starts_with("JSON Error: expected employee array"));
        assert!(shown.contains("json.rs"));

        let wrapped: InsightfulError = err.into();
        assert!(matches!(wrapped.kind(), InsightfulErrorKind::Json(_)));
    }
}
