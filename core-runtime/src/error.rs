//! Runtime bootstrap errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A filter directive did not parse.
    #[error("Invalid log filter `{directive}`: {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Unknown log format `{0}` (expected pretty, json or compact)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
