//! Workcast core data models.
//!
//! This crate defines the records the estimation engine reasons over:
//! work items, the estimates they own, and per-performer profiles.

#![warn(missing_docs)]

// Core identities
mod id;

// Work and estimation
mod work_item;
mod estimate;
mod profile;

// Re-exports
pub use id::*;

pub use work_item::{WorkItem, WorkType, Complexity, WorkStatus};
pub use estimate::{Estimate, SECONDS_PER_HOUR};
pub use profile::{PerformerProfile, RunningStats};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Failure to parse a closed-set tag from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not one of the known work types
    #[error("unknown work type: {0}")]
    UnknownWorkType(String),

    /// Not a complexity ordinal in 1..=5 or a known label
    #[error("unknown complexity: {0}")]
    UnknownComplexity(String),

    /// Not one of the known statuses
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}
