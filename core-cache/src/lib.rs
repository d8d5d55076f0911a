//! # Core Cache
//!
//! Content-addressed local cache for remote video files.
//!
//! ## Overview
//!
//! Every HTTP(S) URL maps to one deterministic path:
//!
//! ```text
//! <root>/<group>/<sha1 hex>.<resource type>
//! ```
//!
//! - `group` is the caller's `cache_group`, or the URL host reduced to
//!   lowercase ASCII alphanumerics
//! - the SHA-1 covers the URL's directory, file name, resource type and,
//!   depending on [`QueryParamPolicy`], some or all query values
//! - the resource type is the file extension when it names a known video
//!   container, `mp4` otherwise
//!
//! Playback layers ask [`VideoCache::resolve_cached_path`] for a local copy
//! and fall back to the remote URL on a miss. Feed-style screens call
//! [`VideoCache::cache_multiple`] to warm the cache ahead of time.
//!
//! ## Components
//!
//! - [`key`] and [`path`]: pure URL to path mapping
//! - [`store`]: tolerant filesystem helper over
//!   [`FileSystemAccess`](bridge_traits::FileSystemAccess)
//! - [`download`]: one transfer per destination path, shared by all callers
//! - [`engine`]: the public [`VideoCache`] operations
//!
//! ## Example
//!
//! ```rust,ignore
//! use core_cache::{CacheConfig, CacheOptions, VideoCache};
//!
//! let cache = VideoCache::open(CacheConfig::default(), fs, http).await?;
//! let options = CacheOptions::default();
//!
//! let outcomes = cache.cache_multiple(feed_urls, &options).await;
//! match cache.resolve_cached_path(&url, &options).await {
//!     Ok(local) => play(local),
//!     Err(e) if e.is_miss() => play_remote(&url),
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod config;
pub mod download;
pub mod engine;
pub mod error;
pub mod headers;
pub mod key;
pub mod options;
pub mod path;
pub mod stats;
pub mod store;

pub use config::CacheConfig;
pub use download::{DownloadCoordinator, DownloadStats};
pub use engine::VideoCache;
pub use error::{CacheError, Result, TransferError};
pub use headers::{HeaderError, HeaderResolver, Headers, NoHeaders, StaticHeaders};
pub use key::{CacheKey, DEFAULT_RESOURCE_TYPE, VIDEO_EXTENSIONS};
pub use options::{CacheOptions, QueryParamPolicy};
pub use path::{cache_group, is_cacheable, CacheLocation, CachePathResolver};
pub use stats::{CacheInfo, CachedFile, PrefetchOutcome, PrefetchStatus};
pub use store::{CacheStore, EntryState};
