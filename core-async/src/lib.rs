//! Runtime facade for the video cache workspace.
//!
//! Every other crate in the workspace reaches the async runtime through this
//! crate instead of naming tokio directly, so swapping or configuring the
//! executor only touches one place.
//!
//! # Modules
//!
//! - `fs`: async filesystem primitives
//! - `io`: async read/write traits and helpers
//! - `sync`: locks, semaphores and channels
//! - `task`: spawning
//! - `time`: sleep and timeouts
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{timeout, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     let value = timeout(Duration::from_secs(1), handle).await;
//!     assert!(value.is_ok());
//! }
//! ```

pub mod fs;
pub mod io;
pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
