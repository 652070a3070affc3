//! Error types for the lock engine

use thiserror::Error;

/// Result type for lock-engine operations
pub type Result<T> = std::result::Result<T, LockerError>;

/// Lock engine errors
#[derive(Debug, Error)]
pub enum LockerError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No lock entry for the given scope
    #[error("No lock found for scope: {0}")]
    NotFound(String),

    /// Persistent store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Exchange-format import failure
    #[error("Import error: {0}")]
    Import(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
