//! # Host Bridge Traits
//!
//! Capabilities the video cache needs from its host but does not implement
//! itself.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - streaming `GET` with headers
//! - [`FileSystemAccess`](storage::FileSystemAccess) - stat, list, create, copy, delete
//! - [`LoggerSink`](log::LoggerSink) - forward structured logs to the host
//!
//! Desktop implementations live in `bridge-desktop`. Mobile hosts inject their
//! own adapters.
//!
//! ## Error Handling
//!
//! Every trait reports failures as [`BridgeError`](error::BridgeError).
//! Implementations should keep the original `std::io::Error` (via
//! `BridgeError::Io`) so callers can tell "not found" from real failures.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`; the cache shares one instance of each
//! across all of its concurrent operations.

pub mod error;
pub mod http;
pub mod log;
pub mod storage;

pub use error::BridgeError;

pub use http::{HttpClient, HttpRequest, HttpStreamResponse};
pub use log::{LogEntry, LogLevel, LoggerSink};
pub use storage::{FileMetadata, FileSystemAccess};
