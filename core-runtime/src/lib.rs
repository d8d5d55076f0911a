//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the cache crates:
//! - Logging and tracing bootstrap with optional host sink forwarding
//! - Log hygiene helpers (URL and secret redaction)

pub mod error;
pub mod logging;

pub use error::{Error, Result};
