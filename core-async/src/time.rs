//! Time-related abstractions.

pub use tokio::time::{error::Elapsed, sleep, timeout, Sleep, Timeout};

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
