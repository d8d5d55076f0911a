//! Filesystem capability
//!
//! Raw primitives the cache store is built on. Implementations report every
//! failure as-is, "not found" included; deciding which failures are harmless
//! is the caller's job.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// What `stat` reports for a path.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    /// Seconds since the Unix epoch, when the platform records it
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

impl FileMetadata {
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }
}

/// Host filesystem as seen by the cache.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn entry_size(fs: &dyn FileSystemAccess) -> Result<u64> {
///     let cache_dir = fs.get_cache_directory().await?;
///     Ok(fs.metadata(&cache_dir.join("clip.mp4")).await?.size)
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Platform directory for purgeable data; the cache root lives below it.
    async fn get_cache_directory(&self) -> Result<PathBuf>;

    /// Stat a path without following it into a directory listing.
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// `mkdir -p`
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy `from` over `to`, returning the number of bytes copied.
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64>;

    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Move `from` to `to`, replacing `to` if it exists. Both paths are in
    /// the same directory.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// `rm -r`
    async fn delete_dir_all(&self, path: &Path) -> Result<()>;

    /// Immediate children of a directory, in no particular order.
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Create or truncate `path` and return a writer for streaming into it.
    async fn open_write_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn core_async::io::AsyncWrite + Send + Unpin>>;
}
