//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for macOS, Windows and Linux:
//! - `HttpClient` using `reqwest` with a streaming body
//! - `FileSystemAccess` using `tokio::fs`, rooted in the platform cache dir
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TokioFileSystem};
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::new()?);
//! let fs = Arc::new(TokioFileSystem::new());
//! ```

mod filesystem;
mod http;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
