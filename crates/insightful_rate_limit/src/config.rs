//! Configuration structures for the export run.
//!
//! Configuration is layered, with later sources taking precedence:
//! - Bundled defaults (include_str! from insightful.toml)
//! - User overrides (~/.config/insightful/insightful.toml, then ./insightful.toml)
//! - An explicit file passed by the caller
//! - `INSIGHTFUL__SECTION__KEY` environment variables

use insightful_core::ProjectDirectory;
use insightful_error::{ConfigError, InsightfulError, InsightfulResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the API token when `[api].token` is unset.
pub const API_KEY_ENV: &str = "INSIGHTFUL_API_KEY";

/// Where the API lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Scheme and host, without a trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "https://app.insightful.io".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

/// Request spacing and retry settings.
///
/// # Example
///
/// ```toml
/// [rate_limit]
/// request_delay_secs = 0.5
/// retries = 3
/// backoff_factor = 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Minimum spacing between any two requests, in seconds
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: f64,

    /// Attempt budget per logical request
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base of the exponential backoff, in seconds
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Jitter bound as a fraction of each backoff delay
    #[serde(default = "default_jitter_ratio")]
    pub jitter_ratio: f64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_request_delay() -> f64 {
    0.5
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_jitter_ratio() -> f64 {
    0.1
}

fn default_timeout() -> u64 {
    30
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            request_delay_secs: default_request_delay(),
            retries: default_retries(),
            backoff_factor: default_backoff_factor(),
            jitter_ratio: default_jitter_ratio(),
            timeout_secs: default_timeout(),
        }
    }
}

impl RateLimitConfig {
    /// Request spacing as a duration.
    pub fn request_delay(&self) -> Duration {
        secs_to_duration(self.request_delay_secs)
    }

    /// Per-request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Batching of employees within one project run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Upper bound on concurrent fetches within a batch
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Employees per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between consecutive batches, in seconds
    #[serde(default = "default_batch_delay")]
    pub batch_delay_secs: f64,
}

fn default_max_workers() -> usize {
    5
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_delay() -> f64 {
    1.0
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            batch_size: default_batch_size(),
            batch_delay_secs: default_batch_delay(),
        }
    }
}

impl BatchConfig {
    /// Pause between batches as a duration.
    pub fn batch_delay(&self) -> Duration {
        secs_to_duration(self.batch_delay_secs)
    }
}

/// Response cache persistence.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Whether to load and save the cache file
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Cache file location
    #[serde(default = "default_cache_file")]
    pub file: PathBuf,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("insightful_api_cache.json")
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            file: default_cache_file(),
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```no_run
/// use insightful_rate_limit::InsightfulConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = InsightfulConfig::load()?;
/// println!("Request spacing: {:?}", config.rate_limit.request_delay());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct InsightfulConfig {
    /// API location and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Request spacing and retries
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Employee batching
    #[serde(default)]
    pub batch: BatchConfig,

    /// Response cache persistence
    #[serde(default)]
    pub cache: CacheSettings,

    /// Project identifier to display name
    #[serde(default)]
    pub projects: ProjectDirectory,
}

impl InsightfulConfig {
    /// Load configuration from a specific file path only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> InsightfulResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                InsightfulError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                InsightfulError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with the standard precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source fails to parse.
    pub fn load() -> InsightfulResult<Self> {
        Self::load_with(None)
    }

    /// Load configuration with the standard precedence, plus an optional
    /// explicit file layered above the user files.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source fails to parse, or if
    /// `explicit` is given but missing.
    #[instrument]
    pub fn load_with(explicit: Option<&Path>) -> InsightfulResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../insightful.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/insightful/insightful.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("insightful").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("INSIGHTFUL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder
            .build()
            .map_err(|e| {
                InsightfulError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                InsightfulError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        if config.api.token.is_none() {
            config.api.token = std::env::var(API_KEY_ENV).ok().filter(|t| !t.is_empty());
        }

        Ok(config)
    }

    /// The API token, required for any request.
    ///
    /// # Errors
    ///
    /// Returns an error if no token was configured.
    pub fn api_token(&self) -> InsightfulResult<&str> {
        self.api.token.as_deref().ok_or_else(|| {
            ConfigError::new(format!(
                "No API token configured; set {} or [api].token",
                API_KEY_ENV
            ))
            .into()
        })
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}
