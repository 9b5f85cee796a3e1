//! Top-level error wrapper types.

use crate::{CacheError, ConfigError, ExportError, HttpError, JsonError, ValidationError};

/// Every error condition the workspace can produce.
///
/// # Examples
///
/// ```
/// use insightful_error::{InsightfulError, JsonError};
///
/// let err: InsightfulError = JsonError::new("expected array").into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum InsightfulErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON decoding or shape error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Invalid input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Cache persistence error
    #[from(CacheError)]
    Cache(CacheError),
    /// Output file error
    #[from(ExportError)]
    Export(ExportError),
}

/// Insightful error with kind discrimination.
///
/// # Examples
///
/// ```
/// use insightful_error::{InsightfulResult, ConfigError};
///
/// fn might_fail() -> InsightfulResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Insightful Error: {}", _0)]
pub struct InsightfulError(Box<InsightfulErrorKind>);

impl InsightfulError {
    /// Create a new error from a kind.
    pub fn new(kind: InsightfulErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &InsightfulErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to InsightfulErrorKind
impl<T> From<T> for InsightfulError
where
    T: Into<InsightfulErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Insightful operations.
pub type InsightfulResult<T> = std::result::Result<T, InsightfulError>;
