//! Response cache persistence errors.

/// Kinds of cache persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CacheErrorKind {
    /// Cache file does not exist
    #[display("Cache file not found: {}", _0)]
    NotFound(String),
    /// Failed to read cache file
    #[display("Failed to read cache file: {}", _0)]
    FileRead(String),
    /// Failed to write cache file
    #[display("Failed to write cache file: {}", _0)]
    FileWrite(String),
    /// Failed to create the directory holding the cache file
    #[display("Failed to create cache directory: {}", _0)]
    DirectoryCreation(String),
    /// Cache file content is not a JSON object
    #[display("Failed to parse cache file: {}", _0)]
    Parse(String),
    /// Cache content could not be serialized
    #[display("Failed to serialize cache: {}", _0)]
    Serialize(String),
}

/// Cache error with location tracking.
///
/// # Examples
///
/// ```
/// use insightful_error::{CacheError, CacheErrorKind};
///
/// let err = CacheError::new(CacheErrorKind::NotFound("cache.json".to_string()));
/// assert!(err.is_not_found());
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cache Error: {} at line {} in {}", kind, line, file)]
pub struct CacheError {
    /// The kind of error that occurred
    pub kind: CacheErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CacheError {
    /// Create a new cache error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CacheErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the cache file was simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, CacheErrorKind::NotFound(_))
    }
}
