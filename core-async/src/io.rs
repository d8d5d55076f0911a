//! Async I/O traits and utilities.
//!
//! ```rust
//! use core_async::io::{copy, AsyncRead, AsyncWrite};
//!
//! async fn pump<R, W>(mut reader: R, mut writer: W) -> std::io::Result<u64>
//! where
//!     R: AsyncRead + Unpin,
//!     W: AsyncWrite + Unpin,
//! {
//!     copy(&mut reader, &mut writer).await
//! }
//! ```

pub use tokio::io::{
    copy, AsyncBufRead, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
    ReadBuf,
};
