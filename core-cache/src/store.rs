//! Filesystem helper
//!
//! Thin layer over [`FileSystemAccess`] that gives the cache the tolerant
//! semantics it wants: creating an existing directory and deleting a missing
//! path both succeed.

use crate::stats::CachedFile;
use bridge_traits::error::Result;
use bridge_traits::FileSystemAccess;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// What is on disk at a cache path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Missing,
    /// Something other than a regular file occupies the path.
    NotAFile,
    /// A regular file with zero bytes; never a valid entry.
    Empty,
    Valid { size: u64 },
}

#[derive(Clone)]
pub struct CacheStore {
    fs: Arc<dyn FileSystemAccess>,
}

impl CacheStore {
    pub fn new(fs: Arc<dyn FileSystemAccess>) -> Self {
        Self { fs }
    }

    /// Create `path` and its parents. An existing path is success.
    pub async fn ensure_directory(&self, path: &Path) -> Result<()> {
        match self.fs.create_dir_all(path).await {
            Err(e) if e.is_already_exists() => Ok(()),
            other => other,
        }
    }

    /// Remove a file. A missing file is success.
    pub async fn delete_file(&self, path: &Path) -> Result<()> {
        match self.fs.delete_file(path).await {
            Err(e) if e.is_not_found() => Ok(()),
            other => other,
        }
    }

    /// Remove a directory tree. A missing directory is success.
    pub async fn delete_dir(&self, path: &Path) -> Result<()> {
        match self.fs.delete_dir_all(path).await {
            Err(e) if e.is_not_found() => Ok(()),
            other => other,
        }
    }

    /// Classify the entry at `path`.
    pub async fn stat_entry(&self, path: &Path) -> Result<EntryState> {
        match self.fs.metadata(path).await {
            Ok(meta) if meta.is_directory => Ok(EntryState::NotAFile),
            Ok(meta) if meta.size == 0 => Ok(EntryState::Empty),
            Ok(meta) => Ok(EntryState::Valid { size: meta.size }),
            Err(e) if e.is_not_found() => Ok(EntryState::Missing),
            Err(e) => Err(e),
        }
    }

    /// Copy `from` over `to`, returning bytes copied.
    pub async fn copy_into(&self, from: &Path, to: &Path) -> Result<u64> {
        self.fs.copy_file(from, to).await
    }

    /// Move a finished file into place, replacing whatever was there.
    pub async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.fs.rename(from, to).await
    }

    pub async fn open_writer(
        &self,
        path: &Path,
    ) -> Result<Box<dyn core_async::io::AsyncWrite + Send + Unpin>> {
        self.fs.open_write_stream(path).await
    }

    /// Every regular file under `path` with its size, sorted by path.
    ///
    /// A missing or unreadable `path` yields an empty list; unreadable
    /// entries below it are skipped.
    pub async fn list_recursive(&self, path: &Path) -> Vec<CachedFile> {
        let mut files = Vec::new();
        let mut pending: Vec<PathBuf> = vec![path.to_path_buf()];

        while let Some(current) = pending.pop() {
            let meta = match self.fs.metadata(&current).await {
                Ok(meta) => meta,
                Err(e) => {
                    if !e.is_not_found() {
                        warn!(path = ?current, error = %e, "Skipping unreadable cache entry");
                    }
                    continue;
                }
            };

            if !meta.is_directory {
                files.push(CachedFile {
                    path: current,
                    size: meta.size,
                });
                continue;
            }

            match self.fs.list_directory(&current).await {
                Ok(children) => pending.extend(children),
                Err(e) => {
                    warn!(path = ?current, error = %e, "Skipping unreadable cache directory")
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(root = ?path, files = files.len(), "Listed cache entries");
        files
    }
}
