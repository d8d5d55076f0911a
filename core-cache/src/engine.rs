//! # Video Cache Engine
//!
//! Public operations of the cache. Every URL-taking operation first maps the
//! URL to its deterministic path, so two calls for the same URL and options
//! always touch the same file.
//!
//! Downloads go through a [`DownloadCoordinator`], which guarantees at most
//! one transfer per path. Batch prefetch runs a bounded pool of workers over
//! a shared queue; one URL failing never affects the others.

use crate::config::CacheConfig;
use crate::download::DownloadCoordinator;
use crate::error::{CacheError, Result};
use crate::headers::{HeaderResolver, NoHeaders};
use crate::options::CacheOptions;
use crate::path::{is_cacheable, CacheLocation, CachePathResolver};
use crate::stats::{CacheInfo, PrefetchOutcome, PrefetchStatus};
use crate::store::{CacheStore, EntryState};
use bridge_traits::{FileSystemAccess, HttpClient};
use core_runtime::logging::redact_url;
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Content-addressed cache for remote video files.
pub struct VideoCache {
    config: CacheConfig,
    paths: CachePathResolver,
    store: CacheStore,
    downloads: DownloadCoordinator,
    header_resolver: Arc<dyn HeaderResolver>,
}

impl VideoCache {
    /// Open the cache, creating its root directory.
    ///
    /// The root is `config.root_override` if set, else
    /// `<fs cache directory>/<config.cache_directory>`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = VideoCache::open(CacheConfig::default(), fs, http).await?;
    /// let local = cache
    ///     .cache_resource("https://cdn.example.com/clips/demo.mp4", &CacheOptions::default())
    ///     .await?;
    /// ```
    #[instrument(skip_all)]
    pub async fn open(
        config: CacheConfig,
        fs: Arc<dyn FileSystemAccess>,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self> {
        config.validate().map_err(CacheError::Config)?;

        let root = match &config.root_override {
            Some(root) => root.clone(),
            None => fs.get_cache_directory().await?.join(&config.cache_directory),
        };

        let store = CacheStore::new(fs);
        store.ensure_directory(&root).await?;

        let downloads = DownloadCoordinator::new(http, store.clone(), config.download_timeout);
        info!(root = ?root, "Video cache ready");

        Ok(Self {
            config,
            paths: CachePathResolver::new(root),
            store,
            downloads,
            header_resolver: Arc::new(NoHeaders),
        })
    }

    /// Open the cache on the local filesystem with the reqwest client.
    #[cfg(feature = "desktop-shims")]
    pub async fn open_desktop(config: CacheConfig) -> Result<Self> {
        let http = bridge_desktop::ReqwestHttpClient::new()
            .map_err(|e| CacheError::Config(e.to_string()))?;
        Self::open(
            config,
            Arc::new(bridge_desktop::TokioFileSystem::new()),
            Arc::new(http),
        )
        .await
    }

    /// Use `resolver` for headers on every download that does not pass its own.
    pub fn with_header_resolver(mut self, resolver: Arc<dyn HeaderResolver>) -> Self {
        self.header_resolver = resolver;
        self
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn default_options(&self) -> &CacheOptions {
        &self.config.default_options
    }

    /// Number of downloads currently running.
    pub fn in_flight_count(&self) -> usize {
        self.downloads.in_flight_count()
    }

    pub fn downloads(&self) -> &DownloadCoordinator {
        &self.downloads
    }

    /// Path a URL is cached at. Pure; the file may not exist.
    pub fn cache_path(&self, url: &str, options: &CacheOptions) -> Result<PathBuf> {
        Ok(self.paths.locate(url, options)?.path)
    }

    /// Path of a valid cached copy of `url`.
    ///
    /// A zero-byte file at the path is treated as corrupt: it is deleted and
    /// reported as a miss, unless a download for the path is running, in
    /// which case it is left for the download to replace.
    ///
    /// # Errors
    ///
    /// [`CacheError::CacheMiss`] when no valid entry exists.
    #[instrument(skip(self, url, options), fields(url = %redact_url(url)))]
    pub async fn resolve_cached_path(&self, url: &str, options: &CacheOptions) -> Result<PathBuf> {
        let location = self.paths.locate(url, options)?;
        self.resolve_location(&location).await
    }

    async fn resolve_location(&self, location: &CacheLocation) -> Result<PathBuf> {
        let path = &location.path;

        let state = match self.store.stat_entry(path).await {
            Ok(state) => state,
            Err(e) => {
                warn!(path = ?path, error = %e, "Cannot stat cache entry, treating as miss");
                return Err(CacheError::CacheMiss(path.clone()));
            }
        };

        match state {
            EntryState::Valid { size } => {
                debug!(path = ?path, size, "Cache hit");
                Ok(path.clone())
            }
            EntryState::Empty if self.downloads.is_in_flight(path) => {
                debug!(path = ?path, "Empty entry is being replaced by a running download");
                Err(CacheError::CacheMiss(path.clone()))
            }
            EntryState::Empty => {
                warn!(path = ?path, "Removing empty cache entry");
                if let Err(e) = self.store.delete_file(path).await {
                    warn!(path = ?path, error = %e, "Failed to remove empty cache entry");
                }
                Err(CacheError::CacheMiss(path.clone()))
            }
            EntryState::Missing | EntryState::NotAFile => {
                debug!(path = ?path, "Cache miss");
                Err(CacheError::CacheMiss(path.clone()))
            }
        }
    }

    /// Download `url` into the cache and return its local path.
    ///
    /// Always transfers, even if a valid copy exists; use
    /// [`get_or_cache`](Self::get_or_cache) to download only on a miss.
    /// Concurrent calls for the same path share one transfer.
    pub async fn cache_resource(&self, url: &str, options: &CacheOptions) -> Result<PathBuf> {
        self.cache_resource_with_headers(url, options, self.header_resolver.as_ref())
            .await
    }

    /// Like [`cache_resource`](Self::cache_resource) with a per-call header
    /// capability.
    #[instrument(skip(self, url, options, headers), fields(url = %redact_url(url)))]
    pub async fn cache_resource_with_headers(
        &self,
        url: &str,
        options: &CacheOptions,
        headers: &dyn HeaderResolver,
    ) -> Result<PathBuf> {
        let location = self.paths.locate(url, options)?;
        self.download_location(url, &location, headers).await
    }

    async fn download_location(
        &self,
        url: &str,
        location: &CacheLocation,
        headers: &dyn HeaderResolver,
    ) -> Result<PathBuf> {
        if let Some(group_dir) = location.path.parent() {
            self.store.ensure_directory(group_dir).await?;
        }

        let headers = headers
            .resolve_headers()
            .await
            .map_err(|e| CacheError::HeaderResolution(e.to_string()))?;

        let path = self
            .downloads
            .download(url, &location.path, headers)
            .await?;
        Ok(path)
    }

    /// Cached path of `url`, downloading it first on a miss.
    pub async fn get_or_cache(&self, url: &str, options: &CacheOptions) -> Result<PathBuf> {
        let location = self.paths.locate(url, options)?;
        match self.resolve_location(&location).await {
            Ok(path) => Ok(path),
            Err(_) => {
                self.download_location(url, &location, self.header_resolver.as_ref())
                    .await
            }
        }
    }

    /// Delete the cached copy of `url`. Never fails; a missing entry or an
    /// unparseable URL is a no-op.
    #[instrument(skip(self, url, options), fields(url = %redact_url(url)))]
    pub async fn delete_cached_resource(&self, url: &str, options: &CacheOptions) {
        let path = match self.paths.locate(url, options) {
            Ok(location) => location.path,
            Err(e) => {
                debug!(error = %e, "Nothing to delete");
                return;
            }
        };

        match self.store.delete_file(&path).await {
            Ok(()) => debug!(path = ?path, "Deleted cache entry"),
            Err(e) => warn!(path = ?path, error = %e, "Failed to delete cache entry"),
        }
    }

    /// Make sure every URL is cached, using the default header capability.
    pub async fn cache_multiple<I, S>(&self, urls: I, options: &CacheOptions) -> Vec<PrefetchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cache_multiple_with_headers(urls, options, self.header_resolver.as_ref())
            .await
    }

    /// Make sure every URL is cached.
    ///
    /// Runs `min(distinct urls, max_prefetch_workers)` workers over a shared
    /// queue. Each URL is checked with
    /// [`resolve_cached_path`](Self::resolve_cached_path) and downloaded on
    /// a miss. Non-HTTP(S) URLs are skipped. Failures are logged and
    /// reported per URL. Outcomes come back in input order.
    #[instrument(skip_all)]
    pub async fn cache_multiple_with_headers<I, S>(
        &self,
        urls: I,
        options: &CacheOptions,
        headers: &dyn HeaderResolver,
    ) -> Vec<PrefetchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        if urls.is_empty() {
            return Vec::new();
        }

        let distinct = urls.iter().collect::<HashSet<_>>().len();
        let workers = distinct.min(self.config.max_prefetch_workers).max(1);
        let total = urls.len();
        debug!(total, workers, "Starting prefetch");

        let pending = Mutex::new(urls.into_iter().enumerate().collect::<VecDeque<_>>());
        let results = Mutex::new(Vec::with_capacity(total));

        let (queue, done) = (&pending, &results);
        let worker = || async move {
            loop {
                let next = queue.lock().pop_front();
                let Some((index, url)) = next else {
                    break;
                };
                let status = self.prefetch_one(&url, options, headers).await;
                done.lock().push((index, PrefetchOutcome { url, status }));
            }
        };
        join_all((0..workers).map(|_| worker())).await;

        let mut finished = results.into_inner();
        finished.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<PrefetchOutcome> = finished.into_iter().map(|(_, o)| o).collect();

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        let skipped = outcomes
            .iter()
            .filter(|o| o.status == PrefetchStatus::Skipped)
            .count();
        let downloaded = outcomes
            .iter()
            .filter(|o| matches!(o.status, PrefetchStatus::Downloaded(_)))
            .count();
        info!(
            total,
            hits = total - failed - skipped - downloaded,
            downloaded,
            skipped,
            failed,
            "Prefetch finished"
        );

        outcomes
    }

    async fn prefetch_one(
        &self,
        url: &str,
        options: &CacheOptions,
        headers: &dyn HeaderResolver,
    ) -> PrefetchStatus {
        if !is_cacheable(url) {
            debug!(url = %redact_url(url), "Skipping non-HTTP URL");
            return PrefetchStatus::Skipped;
        }

        if let Ok(path) = self.resolve_cached_path(url, options).await {
            return PrefetchStatus::Hit(path);
        }

        match self.cache_resource_with_headers(url, options, headers).await {
            Ok(path) => PrefetchStatus::Downloaded(path),
            Err(e) => {
                warn!(url = %redact_url(url), error = %e, "Prefetch failed");
                PrefetchStatus::Failed(e.to_string())
            }
        }
    }

    /// Delete the cached copy of every URL, one after another.
    #[instrument(skip_all)]
    pub async fn delete_multiple<I, S>(&self, urls: I, options: &CacheOptions)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        for url in urls {
            self.delete_cached_resource(url.as_ref(), options).await;
            count += 1;
        }
        debug!(count, "Deleted cache entries");
    }

    /// Copy a local file into the cache as the entry for `url`.
    ///
    /// Overwrites any existing entry. Does not check that `local` is
    /// non-empty; an empty seed is cleaned up by the next lookup.
    #[instrument(skip(self, url, options), fields(url = %redact_url(url)))]
    pub async fn seed(&self, local: &Path, url: &str, options: &CacheOptions) -> Result<PathBuf> {
        let location = self.paths.locate(url, options)?;
        if let Some(group_dir) = location.path.parent() {
            self.store.ensure_directory(group_dir).await?;
        }

        let bytes = self.store.copy_into(local, &location.path).await?;
        info!(path = ?location.path, bytes, "Seeded cache entry");
        Ok(location.path)
    }

    /// Remove everything under the root and recreate it empty. Never fails;
    /// problems are logged.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) {
        let root = self.root();

        if let Err(e) = self.store.delete_dir(root).await {
            warn!(root = ?root, error = %e, "Failed to remove cache root");
        }
        if let Err(e) = self.store.ensure_directory(root).await {
            warn!(root = ?root, error = %e, "Failed to recreate cache root");
        }
        info!(root = ?root, "Cache cleared");
    }

    /// Every file under the root with its size, plus the total.
    #[instrument(skip(self))]
    pub async fn get_aggregate_info(&self) -> Result<CacheInfo> {
        self.store.ensure_directory(self.root()).await?;

        let info = CacheInfo::from_files(self.store.list_recursive(self.root()).await);
        debug!(
            files = info.file_count(),
            total_size = info.total_size,
            "Collected cache info"
        );
        Ok(info)
    }
}
