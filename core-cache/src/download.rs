//! Download coordination
//!
//! At most one transfer runs per destination path. The first caller for a
//! path starts the transfer on its own task and registers a shared handle;
//! later callers for the same path join that handle and receive the same
//! result. The transfer task removes the registry entry when it settles, so
//! the next call after completion starts fresh.
//!
//! Bytes are streamed into a sibling `<destination>.part` file which is
//! renamed over the destination only once the body is complete. The
//! destination therefore only ever holds a finished file, and a failed
//! refresh leaves the previous copy in place.
//!
//! Transfers are not cancelled when callers go away. A caller dropping its
//! future only stops waiting; the task still finishes, cleans up partial
//! files on failure and clears the registry.

use crate::error::TransferError;
use crate::headers::Headers;
use crate::store::CacheStore;
use bridge_traits::{HttpClient, HttpRequest};
use core_async::io::AsyncWriteExt;
use core_runtime::logging::{redact_if_sensitive, redact_url};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

type TransferResult = Result<PathBuf, TransferError>;
type SharedTransfer = Shared<BoxFuture<'static, TransferResult>>;
type Registry = Arc<Mutex<HashMap<PathBuf, SharedTransfer>>>;

const PARTIAL_SUFFIX: &str = ".part";

/// Where the body of a transfer to `destination` is written until it completes.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Header map as it may appear in logs: credential values are masked.
fn loggable_headers(headers: &Headers) -> BTreeMap<&str, String> {
    headers
        .iter()
        .map(|(name, value)| (name.as_str(), redact_if_sensitive(name, value)))
        .collect()
}

/// Counters for deduplication.
#[derive(Debug, Default)]
pub struct DownloadStats {
    /// Transfers actually started.
    pub started: AtomicU64,
    /// Calls that joined a transfer already in flight.
    pub joined: AtomicU64,
}

impl DownloadStats {
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    pub fn joined(&self) -> u64 {
        self.joined.load(Ordering::Relaxed)
    }
}

pub struct DownloadCoordinator {
    http: Arc<dyn HttpClient>,
    store: CacheStore,
    timeout: Duration,
    in_flight: Registry,
    stats: Arc<DownloadStats>,
}

impl DownloadCoordinator {
    pub fn new(http: Arc<dyn HttpClient>, store: CacheStore, timeout: Duration) -> Self {
        Self {
            http,
            store,
            timeout,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            stats: Arc::new(DownloadStats::default()),
        }
    }

    /// Download `url` to `destination`, or join the transfer already
    /// writing `destination`.
    ///
    /// When joining, `headers` are ignored; the running transfer keeps the
    /// headers of the call that started it.
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
        headers: Headers,
    ) -> TransferResult {
        let transfer = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.entry(destination.to_path_buf()) {
                Entry::Occupied(existing) => {
                    self.stats.joined.fetch_add(1, Ordering::Relaxed);
                    debug!(path = ?destination, "Joining in-flight download");
                    existing.get().clone()
                }
                Entry::Vacant(vacant) => {
                    self.stats.started.fetch_add(1, Ordering::Relaxed);
                    let transfer = self.start(url, destination, headers);
                    vacant.insert(transfer.clone());
                    transfer
                }
            }
        };

        transfer.await
    }

    /// Number of destinations with a transfer in flight.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn is_in_flight(&self, destination: &Path) -> bool {
        self.in_flight.lock().contains_key(destination)
    }

    pub fn stats(&self) -> &DownloadStats {
        &self.stats
    }

    /// Spawn the transfer task. Must be called with the registry locked so
    /// the task cannot deregister before it has been registered.
    fn start(&self, url: &str, destination: &Path, headers: Headers) -> SharedTransfer {
        let job = TransferJob {
            http: Arc::clone(&self.http),
            store: self.store.clone(),
            url: url.to_string(),
            partial: partial_path(destination),
            destination: destination.to_path_buf(),
            headers,
            timeout: self.timeout,
        };
        let registration = Registration {
            registry: Arc::clone(&self.in_flight),
            destination: destination.to_path_buf(),
        };

        let handle = core_async::task::spawn(async move {
            let _registration = registration;
            job.run().await
        });

        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(TransferError::Aborted(e.to_string())),
            }
        }
        .boxed()
        .shared()
    }
}

/// Removes the registry entry when the transfer task ends, panics included.
struct Registration {
    registry: Registry,
    destination: PathBuf,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.destination);
    }
}

struct TransferJob {
    http: Arc<dyn HttpClient>,
    store: CacheStore,
    url: String,
    destination: PathBuf,
    partial: PathBuf,
    headers: Headers,
    timeout: Duration,
}

impl TransferJob {
    async fn run(self) -> TransferResult {
        let url = redact_url(&self.url);
        debug!(
            url = %url,
            path = ?self.destination,
            headers = ?loggable_headers(&self.headers),
            "Starting download"
        );

        let fetched = match core_async::time::timeout(self.timeout, self.fetch()).await {
            Ok(fetched) => fetched,
            Err(_) => Err(TransferError::Timeout(self.timeout)),
        };
        let outcome = match fetched {
            Ok(bytes) => self
                .store
                .rename(&self.partial, &self.destination)
                .await
                .map(|()| bytes)
                .map_err(|e| TransferError::Io(e.to_string())),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(bytes) => {
                if bytes == 0 {
                    warn!(url = %url, path = ?self.destination, "Download produced an empty file");
                }
                info!(url = %url, path = ?self.destination, bytes, "Download complete");
                Ok(self.destination)
            }
            Err(err) => {
                if let Err(cleanup) = self.store.delete_file(&self.partial).await {
                    warn!(
                        path = ?self.partial,
                        error = %cleanup,
                        "Failed to remove partial download"
                    );
                }
                warn!(url = %url, error = %err, "Download failed");
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<u64, TransferError> {
        let request = HttpRequest::get(&self.url)
            .headers(self.headers.clone())
            .timeout(self.timeout);

        let response = self
            .http
            .download_stream(request)
            .await
            .map_err(|e| TransferError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(TransferError::Status {
                status: response.status,
            });
        }

        let expected = response.content_length();
        let mut writer = self
            .store
            .open_writer(&self.partial)
            .await
            .map_err(|e| TransferError::Io(e.to_string()))?;
        let mut body = response.body;

        let written = core_async::io::copy(&mut body, &mut writer)
            .await
            .map_err(|e| TransferError::Io(e.to_string()))?;
        writer
            .shutdown()
            .await
            .map_err(|e| TransferError::Io(e.to_string()))?;

        match expected {
            Some(expected) if expected != written => Err(TransferError::Io(format!(
                "body ended after {} of {} bytes",
                written, expected
            ))),
            _ => Ok(written),
        }
    }
}
