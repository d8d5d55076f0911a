//! Synchronization primitives.
//!
//! Async-aware locks (held across `.await`) come from tokio. Short critical
//! sections that never suspend should prefer `parking_lot` at the call site.
//!
//! ```rust
//! use core_async::sync::Mutex;
//!
//! async fn bump(counter: &Mutex<u32>) {
//!     *counter.lock().await += 1;
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, Semaphore,
    SemaphorePermit,
};
