//! Prefetch demonstration
//!
//! Warms the cache with the URLs given on the command line and prints what
//! ended up on disk.
//!
//! Run with:
//! ```bash
//! cargo run -p core-cache --features desktop-shims --example prefetch -- \
//!     https://example.com/clips/intro.mp4 https://example.com/clips/outro.webm
//!
//! # Cache somewhere else, with debug logs as JSON
//! VIDEO_CACHE_ROOT=/tmp/videos RUST_LOG=core_cache=debug LOG_FORMAT=json \
//!     cargo run -p core-cache --features desktop-shims --example prefetch -- <urls>
//! ```

use anyhow::Context;
use bridge_traits::LogLevel;
use core_cache::{CacheConfig, CacheOptions, PrefetchStatus, VideoCache};
use core_runtime::logging::{init_logging, redact_url, LogFormat, LoggingConfig};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut logging = LoggingConfig::default().with_level(LogLevel::Info);
    if let Ok(filter) = env::var("RUST_LOG") {
        logging = logging.with_filter(filter);
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        logging = logging.with_format(format.parse::<LogFormat>()?);
    }
    init_logging(logging).context("failed to initialize logging")?;

    let urls: Vec<String> = env::args().skip(1).collect();
    if urls.is_empty() {
        eprintln!("usage: prefetch <url>...");
        return Ok(());
    }

    let mut config = CacheConfig::default();
    if let Ok(root) = env::var("VIDEO_CACHE_ROOT") {
        config = config.with_root(root);
    }

    let cache = VideoCache::open_desktop(config)
        .await
        .context("failed to open video cache")?;
    println!("cache root: {}", cache.root().display());

    let outcomes = cache.cache_multiple(urls, &CacheOptions::default()).await;
    for outcome in &outcomes {
        let url = redact_url(&outcome.url);
        match &outcome.status {
            PrefetchStatus::Hit(path) => println!("hit        {} -> {}", url, path.display()),
            PrefetchStatus::Downloaded(path) => {
                println!("downloaded {} -> {}", url, path.display())
            }
            PrefetchStatus::Skipped => println!("skipped    {}", url),
            PrefetchStatus::Failed(reason) => println!("failed     {} ({})", url, reason),
        }
    }

    let info = cache.get_aggregate_info().await?;
    println!(
        "{} file(s), {} bytes in cache",
        info.file_count(),
        info.total_size
    );

    Ok(())
}
