//! Workspace facade crate.
//!
//! Host applications depend on `video-cache-workspace` to get the cache engine,
//! its bridge traits and (with `desktop-shims`) the desktop adapters without
//! wiring each workspace crate individually.

pub use bridge_traits;
pub use core_cache;
pub use core_runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

pub use core_cache::{
    is_cacheable, CacheConfig, CacheError, CacheInfo, CacheOptions, CachedFile, HeaderResolver,
    NoHeaders, PrefetchOutcome, PrefetchStatus, QueryParamPolicy, StaticHeaders, TransferError,
    VideoCache,
};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
