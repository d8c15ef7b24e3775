//! Work Management
//!
//! The in-memory work ledger: creating, estimating, scheduling and
//! completing work items, plus the read queries built on top of them.

#![warn(missing_docs)]

pub mod error;
pub mod manager;
pub mod workload;

pub use error::{WorkError, Result};
pub use manager::{WorkManager, WorkItemSpec};
pub use workload::{PerformerWorkload, InProgressItem};
