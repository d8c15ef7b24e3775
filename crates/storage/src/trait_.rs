//! Storage trait abstraction.

use async_trait::async_trait;
use workcast_core::{PerformerProfile, WorkItem};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Persistence collaborator for the work ledger.
///
/// Work items and performer profiles are two independently loadable
/// collections. Saves always write both in full.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load every work item, in stored order.
    async fn load_work_items(&self) -> Result<Vec<WorkItem>>;

    /// Load every performer profile, in stored order.
    async fn load_profiles(&self) -> Result<Vec<PerformerProfile>>;

    /// Replace the stored collections.
    async fn save(&mut self, work_items: &[WorkItem], profiles: &[PerformerProfile]) -> Result<()>;
}
