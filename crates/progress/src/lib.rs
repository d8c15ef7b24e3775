//! Estimation engine.
//!
//! Duration estimates, confidence intervals, scheduling, profile learning,
//! and critical path analysis.

#![warn(missing_docs)]

pub mod config;
pub mod estimator;
pub mod confidence;
pub mod scheduler;
pub mod learning;
pub mod critical_path;

pub use config::EstimationConfig;
pub use estimator::{DurationEstimator, prior_hours, unmet_dependencies};
pub use confidence::{ConfidenceInterval, z_multiplier, select_dispersion};
pub use scheduler::Scheduler;
pub use learning::{ProfileLearner, LearningOutcome};
pub use critical_path::{CriticalPathAnalyzer, CriticalPath, NodeTiming};
