//! Deterministic cache path layout: `<root>/<group>/<digest>.<resource type>`

use crate::error::{CacheError, Result};
use crate::key::CacheKey;
use crate::options::CacheOptions;
use core_runtime::logging::redact_url;
use std::path::{Path, PathBuf};
use url::Url;

/// Returns `true` if the URL uses `http://` or `https://`.
///
/// This is a plain prefix check; anything else (local files, content URIs,
/// data URLs) is meant to be used in place.
pub fn is_cacheable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Where one URL lives inside the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    pub group: String,
    pub key: CacheKey,
    pub path: PathBuf,
}

/// Maps URLs to paths under a fixed root. Pure; never touches the filesystem.
#[derive(Debug, Clone)]
pub struct CachePathResolver {
    root: PathBuf,
}

impl CachePathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a URL to its cache location.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotCacheable`] for non-HTTP(S) URLs and
    /// [`CacheError::InvalidUrl`] when the URL does not parse.
    pub fn locate(&self, url: &str, options: &CacheOptions) -> Result<CacheLocation> {
        let parsed = parse_cacheable(url)?;
        let group = cache_group(&parsed, options);
        let key = CacheKey::derive(&parsed, &options.use_query_params_in_cache_key);
        let path = self.root.join(&group).join(key.file_name());

        Ok(CacheLocation { group, key, path })
    }
}

fn parse_cacheable(url: &str) -> Result<Url> {
    if !is_cacheable(url) {
        return Err(CacheError::NotCacheable(redact_url(url)));
    }

    Url::parse(url).map_err(|e| CacheError::InvalidUrl {
        url: redact_url(url),
        reason: e.to_string(),
    })
}

/// Group directory for a URL: the explicit `cache_group` verbatim, else the
/// host (with port, if any) stripped to ASCII alphanumerics and lowercased.
pub fn cache_group(url: &Url, options: &CacheOptions) -> String {
    if let Some(group) = &options.cache_group {
        return group.clone();
    }

    let mut host = url.host_str().unwrap_or_default().to_string();
    if let Some(port) = url.port() {
        host.push_str(&port.to_string());
    }

    host.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
