//! Concurrency behaviour of in-flight download sharing.

mod common;

use common::{open_cache, open_cache_with, write, FakeHttp, Reply};
use core_cache::download::partial_path;
use core_cache::{CacheConfig, CacheError, CacheOptions, TransferError};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

const CLIP: &str = "https://cdn.example.com/feed/clip.mp4";

#[tokio::test]
async fn test_concurrent_requests_share_one_transfer() {
    let t = open_cache(
        FakeHttp::new().reply(CLIP, Reply::Slow(Duration::from_millis(200), b"shared")),
    )
    .await;
    let options = CacheOptions::default();

    let results = join_all((0..10).map(|_| t.cache.cache_resource(CLIP, &options))).await;

    let expected = t.cache.cache_path(CLIP, &options).unwrap();
    for result in results {
        assert_eq!(result.unwrap(), expected);
    }
    assert_eq!(t.http.calls(), 1);
    assert_eq!(t.cache.downloads().stats().started(), 1);
    assert_eq!(t.cache.downloads().stats().joined(), 9);
    assert_eq!(t.cache.in_flight_count(), 0);
    assert_eq!(std::fs::read(&expected).unwrap(), b"shared");
}

#[tokio::test]
async fn test_joined_callers_share_the_failure() {
    let t = open_cache(FakeHttp::new().reply(CLIP, Reply::Truncated(b"half"))).await;
    let options = CacheOptions::default();

    let results = join_all((0..3).map(|_| t.cache.cache_resource(CLIP, &options))).await;

    for result in results {
        assert!(matches!(
            result,
            Err(CacheError::Transfer(TransferError::Io(_)))
        ));
    }
    assert_eq!(t.http.calls(), 1);
    assert!(!t.cache.cache_path(CLIP, &options).unwrap().exists());
}

#[tokio::test]
async fn test_different_paths_download_independently() {
    let a = "https://cdn.example.com/a.mp4";
    let b = "https://cdn.example.com/b.mp4";
    let t = open_cache(
        FakeHttp::new()
            .reply(a, Reply::Slow(Duration::from_millis(50), b"a"))
            .reply(b, Reply::Slow(Duration::from_millis(50), b"b")),
    )
    .await;
    let options = CacheOptions::default();

    let (ra, rb) = tokio::join!(
        t.cache.cache_resource(a, &options),
        t.cache.cache_resource(b, &options)
    );

    assert_ne!(ra.unwrap(), rb.unwrap());
    assert_eq!(t.http.calls_for(a), 1);
    assert_eq!(t.http.calls_for(b), 1);
}

#[tokio::test]
async fn test_in_flight_entry_visible_while_downloading() {
    let t = open_cache(
        FakeHttp::new().reply(CLIP, Reply::Slow(Duration::from_millis(300), b"slow")),
    )
    .await;
    let options = CacheOptions::default();
    let expected = t.cache.cache_path(CLIP, &options).unwrap();

    let download = t.cache.cache_resource(CLIP, &options);
    let observe = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        (
            t.cache.in_flight_count(),
            t.cache.downloads().is_in_flight(&expected),
        )
    };

    let (result, (count, registered)) = tokio::join!(download, observe);

    assert!(result.is_ok());
    assert_eq!(count, 1);
    assert!(registered);
    assert_eq!(t.cache.in_flight_count(), 0);
}

#[tokio::test]
async fn test_dropped_caller_does_not_cancel_transfer() {
    let t = open_cache(
        FakeHttp::new().reply(CLIP, Reply::Slow(Duration::from_millis(250), b"kept")),
    )
    .await;
    let options = CacheOptions::default();
    let expected = t.cache.cache_path(CLIP, &options).unwrap();

    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        t.cache.cache_resource(CLIP, &options),
    )
    .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(t.cache.in_flight_count(), 0);
    assert_eq!(
        t.cache.resolve_cached_path(CLIP, &options).await.unwrap(),
        expected
    );
    assert_eq!(t.http.calls(), 1);
}

#[tokio::test]
async fn test_timeout_removes_partial_file() {
    let config = CacheConfig::default().with_download_timeout(Duration::from_millis(250));
    let t = open_cache_with(
        FakeHttp::new().reply(
            CLIP,
            Reply::Stalled(b"first frames", Duration::from_secs(5), b"never sent"),
        ),
        config,
    )
    .await;
    let options = CacheOptions::default();
    let destination = t.cache.cache_path(CLIP, &options).unwrap();
    let partial = partial_path(&destination);

    let download = t.cache.cache_resource(CLIP, &options);
    let during = async {
        tokio::time::sleep(Duration::from_millis(120)).await;
        (std::fs::read(&partial).ok(), destination.exists())
    };
    let (result, (written, visible)) = tokio::join!(download, during);

    assert_eq!(written.as_deref(), Some(&b"first frames"[..]));
    assert!(!visible);

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        CacheError::Transfer(TransferError::Timeout(d)) if d == Duration::from_millis(250)
    ));
    assert!(err.is_transient());
    assert!(!destination.exists());
    assert!(!partial.exists());
    assert_eq!(
        std::fs::read_dir(destination.parent().unwrap()).unwrap().count(),
        0
    );
    assert_eq!(t.cache.in_flight_count(), 0);
}

#[tokio::test]
async fn test_resolve_during_download_does_not_disturb_it() {
    let t = open_cache(FakeHttp::new().reply(
        CLIP,
        Reply::Stalled(b"", Duration::from_millis(200), b"late body"),
    ))
    .await;
    let options = CacheOptions::default();

    let download = t.cache.cache_resource(CLIP, &options);
    let peek = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        t.cache.resolve_cached_path(CLIP, &options).await
    };
    let (result, peeked) = tokio::join!(download, peek);

    assert!(peeked.unwrap_err().is_miss());
    let path = result.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"late body");
    assert_eq!(t.cache.resolve_cached_path(CLIP, &options).await.unwrap(), path);
    assert_eq!(t.http.calls(), 1);
}

#[tokio::test]
async fn test_empty_entry_is_left_alone_while_it_is_being_replaced() {
    let t = open_cache(FakeHttp::new().reply(
        CLIP,
        Reply::Stalled(b"", Duration::from_millis(200), b"fresh"),
    ))
    .await;
    let options = CacheOptions::default();
    let destination = t.cache.cache_path(CLIP, &options).unwrap();
    write(&destination, b"");

    let download = t.cache.cache_resource(CLIP, &options);
    let peek = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let resolved = t.cache.resolve_cached_path(CLIP, &options).await;
        (resolved, destination.exists())
    };
    let (result, (resolved, still_there)) = tokio::join!(download, peek);

    assert!(resolved.unwrap_err().is_miss());
    assert!(still_there);
    assert_eq!(result.unwrap(), destination);
    assert_eq!(std::fs::read(&destination).unwrap(), b"fresh");
}

#[tokio::test]
async fn test_transfer_after_settle_starts_fresh() {
    let t = open_cache(FakeHttp::new().reply(CLIP, Reply::Refused)).await;
    let options = CacheOptions::default();

    assert!(t.cache.cache_resource(CLIP, &options).await.is_err());
    assert!(t.cache.cache_resource(CLIP, &options).await.is_err());

    assert_eq!(t.http.calls(), 2);
    assert_eq!(t.cache.downloads().stats().joined(), 0);
}

#[tokio::test]
async fn test_shared_cache_across_tasks() {
    let t = open_cache(
        FakeHttp::new().reply(CLIP, Reply::Slow(Duration::from_millis(150), b"tasks")),
    )
    .await;
    let cache = Arc::new(t.cache);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .cache_resource(CLIP, &CacheOptions::default())
                    .await
                    .map(|p| p.exists())
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }
    assert_eq!(t.http.calls(), 1);
}
