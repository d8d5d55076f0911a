//! Shared fakes for the cache integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::error::Result;
use bridge_traits::{BridgeError, HttpClient, HttpRequest, HttpStreamResponse};
use core_async::io::{AsyncRead, ReadBuf};
use core_cache::{CacheConfig, VideoCache};
use std::collections::HashMap;
use std::io;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tempfile::TempDir;

/// How the fake server answers one URL.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(&'static [u8]),
    Status(u16),
    /// Sends the bytes, then fails the connection.
    Truncated(&'static [u8]),
    /// Declares a longer `Content-Length` than it sends, then ends cleanly.
    Short(u64, &'static [u8]),
    Refused,
    /// Waits this long before sending the bytes.
    Slow(Duration, &'static [u8]),
    /// Answers 200 at once, sends the first bytes, waits, then sends the rest.
    Stalled(&'static [u8], Duration, &'static [u8]),
}

/// HTTP client serving canned replies, counting and recording requests.
#[derive(Default)]
pub struct FakeHttp {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, url: &str, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn download_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .unwrap_or(Reply::Status(404));
        self.requests.lock().unwrap().push(request);

        let mut headers = HashMap::new();
        let (status, body): (u16, Box<dyn AsyncRead + Send + Unpin>) = match reply {
            Reply::Body(bytes) => (200, Box::new(bytes)),
            Reply::Status(status) => (status, Box::new(&b"error page"[..])),
            Reply::Truncated(bytes) => (200, Box::new(FailingReader::new(bytes))),
            Reply::Short(declared, bytes) => {
                headers.insert("Content-Length".to_string(), declared.to_string());
                (200, Box::new(bytes))
            }
            Reply::Refused => {
                return Err(BridgeError::OperationFailed("connection refused".into()))
            }
            Reply::Slow(delay, bytes) => {
                core_async::time::sleep(delay).await;
                (200, Box::new(bytes))
            }
            Reply::Stalled(head, delay, tail) => {
                (200, Box::new(StalledReader::new(head, delay, tail)))
            }
        };

        Ok(HttpStreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Yields its bytes once, then reports a reset connection.
pub struct FailingReader {
    data: Option<&'static [u8]>,
}

impl FailingReader {
    pub fn new(data: &'static [u8]) -> Self {
        Self { data: Some(data) }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.data.take() {
            Some(data) => {
                buf.put_slice(data);
                Poll::Ready(Ok(()))
            }
            None => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
        }
    }
}

/// Yields `head` immediately, then `tail` once `delay` has passed.
pub struct StalledReader {
    head: &'static [u8],
    tail: &'static [u8],
    delay: Pin<Box<core_async::time::Sleep>>,
}

impl StalledReader {
    pub fn new(head: &'static [u8], delay: Duration, tail: &'static [u8]) -> Self {
        Self {
            head,
            tail,
            delay: Box::pin(core_async::time::sleep(delay)),
        }
    }
}

impl AsyncRead for StalledReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if !self.head.is_empty() {
            let n = self.head.len().min(buf.remaining());
            buf.put_slice(&self.head[..n]);
            self.head = &self.head[n..];
            return Poll::Ready(Ok(()));
        }

        if self.delay.as_mut().poll(cx).is_pending() {
            return Poll::Pending;
        }

        let n = self.tail.len().min(buf.remaining());
        buf.put_slice(&self.tail[..n]);
        self.tail = &self.tail[n..];
        Poll::Ready(Ok(()))
    }
}

pub struct TestCache {
    pub dir: TempDir,
    pub http: Arc<FakeHttp>,
    pub cache: VideoCache,
}

impl TestCache {
    pub fn root(&self) -> &std::path::Path {
        self.cache.root()
    }
}

pub async fn open_cache(http: FakeHttp) -> TestCache {
    open_cache_with(http, CacheConfig::default()).await
}

pub async fn open_cache_with(http: FakeHttp, config: CacheConfig) -> TestCache {
    let dir = tempfile::tempdir().unwrap();
    let http = Arc::new(http);
    let fs = Arc::new(TokioFileSystem::with_cache_directory(dir.path().to_path_buf()));
    let cache = VideoCache::open(config, fs, http.clone()).await.unwrap();

    TestCache { dir, http, cache }
}

pub fn write(path: &std::path::Path, data: impl AsRef<[u8]>) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, data).unwrap();
}
