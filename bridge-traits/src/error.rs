use std::io::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when the underlying I/O error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BridgeError::Io(e) if e.kind() == ErrorKind::NotFound)
    }

    /// Returns `true` when the underlying I/O error means the path is already there.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, BridgeError::Io(e) if e.kind() == ErrorKind::AlreadyExists)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
