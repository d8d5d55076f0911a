//! Cache configuration

use crate::options::CacheOptions;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for [`VideoCache`](crate::VideoCache).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Name of the cache root inside the platform cache directory
    pub cache_directory: String,

    /// Absolute cache root that replaces `<platform cache dir>/<cache_directory>`
    pub root_override: Option<PathBuf>,

    /// Upper bound for one whole transfer, body included (default: 300s)
    pub download_timeout: Duration,

    /// Cap on prefetch workers; a batch uses `min(distinct urls, cap)` (default: 8)
    pub max_prefetch_workers: usize,

    /// Options for callers that have none of their own
    pub default_options: CacheOptions,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_directory: "videosCacheDir".to_string(),
            root_override: None,
            download_timeout: Duration::from_secs(300),
            max_prefetch_workers: 8,
            default_options: CacheOptions::default(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_directory(mut self, dir: impl Into<String>) -> Self {
        self.cache_directory = dir.into();
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root_override = Some(root.into());
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn with_max_prefetch_workers(mut self, count: usize) -> Self {
        self.max_prefetch_workers = count;
        self
    }

    pub fn with_default_options(mut self, options: CacheOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.root_override.is_none() && self.cache_directory.is_empty() {
            return Err("cache_directory cannot be empty".to_string());
        }

        if self.max_prefetch_workers == 0 {
            return Err("max_prefetch_workers must be at least 1".to_string());
        }

        if self.download_timeout.is_zero() {
            return Err("download_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
