//! Cache inventory and prefetch outcomes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One file found under the cache root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Aggregate view of everything under the cache root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    /// Every regular file found, sorted by path
    pub files: Vec<CachedFile>,

    /// Sum of `files[*].size`
    pub total_size: u64,
}

impl CacheInfo {
    pub fn from_files(files: Vec<CachedFile>) -> Self {
        let total_size = files.iter().map(|f| f.size).sum();
        Self { files, total_size }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns average bytes per file.
    pub fn average_file_size(&self) -> u64 {
        if self.files.is_empty() {
            0
        } else {
            self.total_size / self.files.len() as u64
        }
    }
}

/// What happened to one URL of a prefetch batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchStatus {
    /// Already cached; nothing was downloaded.
    Hit(PathBuf),
    /// Downloaded during this batch.
    Downloaded(PathBuf),
    /// Not an HTTP(S) URL.
    Skipped,
    /// Download failed; the message is for diagnostics only.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchOutcome {
    pub url: String,
    pub status: PrefetchStatus,
}

impl PrefetchOutcome {
    /// Local path when the URL is now cached.
    pub fn path(&self) -> Option<&PathBuf> {
        match &self.status {
            PrefetchStatus::Hit(path) | PrefetchStatus::Downloaded(path) => Some(path),
            PrefetchStatus::Skipped | PrefetchStatus::Failed(_) => None,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.path().is_some()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, PrefetchStatus::Failed(_))
    }
}
