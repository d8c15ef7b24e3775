//! Error types for the work ledger.

use thiserror::Error;
use workcast_storage::StorageError;

/// Errors surfaced by [`crate::WorkManager`] operations.
#[derive(Debug, Error)]
pub enum WorkError {
    /// Referenced work item or performer does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity is not in a state that allows the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// An argument is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Loading from storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for work ledger operations.
pub type Result<T> = std::result::Result<T, WorkError>;
