//! Response cache implementation.

use insightful_error::{CacheError, CacheErrorKind};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::sync::RwLock;

/// Cache mapping string-encoded query keys to raw decoded response bodies.
///
/// The map sits behind an internal lock, so a single `Arc<ResponseCache>`
/// can be handed to every concurrent worker. Two workers missing the same
/// key at once will both fetch; the later `put` wins. Entries are never
/// evicted and carry no freshness guarantee.
///
/// # Example
///
/// ```
/// use insightful_cache::ResponseCache;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = ResponseCache::new();
/// cache.put("emp-1_proj-a_1000_2000", json!([{"name": "Slack", "usage": 5}])).await;
///
/// let hit = cache.get("emp-1_proj-a_1000_2000").await;
/// assert!(hit.is_some());
/// assert!(cache.get("emp-2_proj-a_1000_2000").await.is_none());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<BTreeMap<String, JsonValue>>,
}

impl ResponseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with `entries`.
    pub fn from_entries(entries: BTreeMap<String, JsonValue>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Cached body for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<JsonValue> {
        let hit = self.entries.read().await.get(key).cloned();
        tracing::trace!(key, hit = hit.is_some(), "Cache lookup");
        hit
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn put(&self, key: impl Into<String>, value: JsonValue) {
        let key = key.into();
        let mut entries = self.entries.write().await;
        let replaced = entries.insert(key, value).is_some();
        tracing::trace!(replaced, size = entries.len(), "Inserted entry into cache");
    }

    /// Whether `key` has an entry.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache has no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Copy of every entry.
    pub async fn snapshot(&self) -> BTreeMap<String, JsonValue> {
        self.entries.read().await.clone()
    }

    /// Read a cache file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the file does not exist, `FileRead` for other
    /// I/O failures, and `Parse` when the content is not a JSON object.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CacheError::new(CacheErrorKind::NotFound(path.display().to_string()))
            } else {
                CacheError::new(CacheErrorKind::FileRead(format!("{}: {}", path.display(), e)))
            }
        })?;

        let entries: BTreeMap<String, JsonValue> = serde_json::from_str(&content)
            .map_err(|e| CacheError::new(CacheErrorKind::Parse(format!("{}: {}", path.display(), e))))?;

        Ok(Self::from_entries(entries))
    }

    /// Load a cache file, degrading to an empty cache on any failure.
    ///
    /// A missing file is expected on first use and is logged at info level;
    /// any other failure is logged as an error.
    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path).await {
            Ok(cache) => {
                tracing::info!(
                    path = %path.display(),
                    entries = cache.len().await,
                    "Loaded response cache"
                );
                cache
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(path = %path.display(), "No cache file found, starting with empty cache");
                Self::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load cache, starting with empty cache");
                Self::new()
            }
        }
    }

    /// Write the cache to `path`.
    ///
    /// Writes to a temporary sibling first and renames it into place.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, temp file or rename fails.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn try_save(&self, path: impl AsRef<Path>) -> Result<(), CacheError> {
        let path = path.as_ref();

        let content = {
            let entries = self.entries.read().await;
            serde_json::to_string_pretty(&*entries)
                .map_err(|e| CacheError::new(CacheErrorKind::Serialize(e.to_string())))?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CacheError::new(CacheErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            CacheError::new(CacheErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            CacheError::new(CacheErrorKind::FileWrite(format!(
                "{} -> {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }

    /// Save the cache, logging rather than returning any failure.
    pub async fn save_to(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_save(path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Cache saved"),
            Err(e) => tracing::error!(error = %e, "Failed to save cache"),
        }
    }
}
