//! Errors from loading layered configuration and credentials.

/// Failure to assemble the run configuration.
///
/// Covers unreadable or malformed TOML in any layer, an explicit
/// `--config` file that does not exist, and a missing API token. All of
/// these end the run before any request is made.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use insightful_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing API token");
    /// assert!(err.message.contains("API token"));
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
