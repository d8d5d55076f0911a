//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    storage::{FileMetadata, FileSystemAccess},
};
use core_async::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tokio-based file system implementation
///
/// Errors are passed through as `BridgeError::Io` untouched so the cache can
/// classify "not found" and "already exists".
pub struct TokioFileSystem {
    cache_dir: PathBuf,
}

impl TokioFileSystem {
    /// Use the platform cache directory (falls back to the temp dir)
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("video-cache");

        Self { cache_dir }
    }

    /// Use a custom cache directory
    pub fn with_cache_directory(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }
}

impl Default for TokioFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn get_cache_directory(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir).await?;
        Ok(self.cache_dir.clone())
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let metadata = fs::metadata(path).await?;

        Ok(FileMetadata {
            size: metadata.len(),
            modified_at: metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64),
            is_directory: metadata.is_dir(),
        })
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await?;
        debug!(path = ?path, "Created directory");
        Ok(())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64> {
        let copied = fs::copy(from, to).await?;
        debug!(from = ?from, to = ?to, size = copied, "Copied file");
        Ok(copied)
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await?;
        debug!(from = ?from, to = ?to, "Renamed file");
        Ok(())
    }

    async fn delete_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).await?;
        debug!(path = ?path, "Deleted directory");
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry.path());
        }

        Ok(entries)
    }

    async fn open_write_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn core_async::io::AsyncWrite + Send + Unpin>> {
        let file = fs::File::create(path).await?;
        debug!(path = ?path, "Opened file for writing");
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_async::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_custom_cache_directory_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("nested").join("cache");
        let fs = TokioFileSystem::with_cache_directory(cache.clone());

        let cache_dir = fs.get_cache_directory().await.unwrap();

        assert_eq!(cache_dir, cache);
        assert!(fs.metadata(&cache).await.unwrap().is_directory);
    }

    #[tokio::test]
    async fn test_copy_and_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::with_cache_directory(tmp.path().to_path_buf());
        let source = tmp.path().join("a.mp4");
        let target = tmp.path().join("b.mp4");
        std::fs::write(&source, b"frames").unwrap();

        assert_eq!(fs.copy_file(&source, &target).await.unwrap(), 6);
        assert_eq!(std::fs::read(&target).unwrap(), b"frames");

        fs.delete_file(&target).await.unwrap();
        let err = fs.delete_file(&target).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stream_write_and_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::with_cache_directory(tmp.path().to_path_buf());
        let path = tmp.path().join("stream.mp4");

        let mut writer = fs.open_write_stream(&path).await.unwrap();
        writer.write_all(b"0123456789").await.unwrap();
        writer.shutdown().await.unwrap();

        let metadata = fs.metadata(&path).await.unwrap();
        assert_eq!(metadata.size, 10);
        assert!(metadata.is_file());

        let dir_meta = fs.metadata(tmp.path()).await.unwrap();
        assert!(dir_meta.is_directory);
    }

    #[tokio::test]
    async fn test_list_directory_and_missing_path() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::with_cache_directory(tmp.path().to_path_buf());
        std::fs::write(tmp.path().join("one"), b"1").unwrap();
        fs.create_dir_all(&tmp.path().join("sub")).await.unwrap();

        let mut entries = fs.list_directory(tmp.path()).await.unwrap();
        entries.sort();
        assert_eq!(entries.len(), 2);

        let missing = tmp.path().join("missing");
        assert!(fs.metadata(&missing).await.unwrap_err().is_not_found());
        assert!(fs.list_directory(&missing).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_rename_replaces_target() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::with_cache_directory(tmp.path().to_path_buf());
        let partial = tmp.path().join("clip.mp4.part");
        let target = tmp.path().join("clip.mp4");
        std::fs::write(&partial, b"new").unwrap();
        std::fs::write(&target, b"old").unwrap();

        fs.rename(&partial, &target).await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        assert!(fs.metadata(&partial).await.unwrap_err().is_not_found());
    }
}
