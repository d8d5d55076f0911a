//! # Cache Error Types

use bridge_traits::BridgeError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The URL does not use `http://` or `https://`; use the resource directly.
    #[error("URL is not cacheable: {0}")]
    NotCacheable(String),

    /// The URL could not be parsed.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No valid entry at the computed path. Zero-byte entries end up here too,
    /// after being deleted.
    #[error("No cached entry at {}", .0.display())]
    CacheMiss(PathBuf),

    /// The download failed; any partial file was already removed.
    #[error("Download failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] BridgeError),

    /// The injected header capability failed before the transfer started.
    #[error("Header resolution failed: {0}")]
    HeaderResolution(String),

    #[error("Invalid cache configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Returns `true` for a plain cache miss; the caller should download.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::CacheMiss(_))
    }

    /// Returns `true` if retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CacheError::Transfer(err) => err.is_transient(),
            CacheError::HeaderResolution(_) => true,
            _ => false,
        }
    }
}

/// Outcome of a failed transfer.
///
/// `Clone` because every caller joined to the same in-flight download gets
/// its own copy of the one result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    /// Reading the body or writing it to disk failed midway.
    #[error("body transfer failed: {0}")]
    Io(String),

    #[error("transfer timed out after {0:?}")]
    Timeout(Duration),

    /// The task driving the transfer panicked or was cancelled.
    #[error("transfer task aborted: {0}")]
    Aborted(String),
}

impl TransferError {
    pub fn is_transient(&self) -> bool {
        match self {
            TransferError::Status { status } => *status >= 500 || *status == 429,
            TransferError::Transport(_) | TransferError::Timeout(_) | TransferError::Io(_) => true,
            TransferError::Aborted(_) => false,
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
