//! Export error types.

/// Failure writing the delimited output file.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", message, line, file)]
pub struct ExportError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ExportError {
    /// Create a new ExportError at the current location.
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
