//! Profile learning from completed work.

use workcast_core::{PerformerProfile, RunningStats, WorkItem};
use tracing::info;

/// What one completion contributed to a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningOutcome {
    /// Observed duration, hours
    pub actual_hours: f64,
    /// Accuracy of the estimate against it, in [0, 100]
    pub accuracy: f64,
}

/// Folds completed work back into performer profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileLearner;

impl ProfileLearner {
    /// Create a learner.
    pub fn new() -> Self {
        Self
    }

    /// Fold one observation into running stats.
    ///
    /// The dispersion update seeds from the previous dispersion rather than
    /// a sum of squares, so it can drift from the sample standard deviation
    /// over many updates.
    pub fn fold(stats: &mut RunningStats, actual: f64) {
        let old_mean = stats.mean;
        let new_count = stats.count + 1;
        let new_mean = (old_mean * stats.count as f64 + actual) / new_count as f64;

        stats.dispersion = if new_count > 1 {
            let variance = stats.dispersion.powi(2)
                + (actual - old_mean) * (actual - new_mean) / new_count as f64;
            variance.max(0.0).sqrt()
        } else {
            0.0
        };
        stats.mean = new_mean;
        stats.count = new_count;
    }

    /// Learn from a completed work item.
    ///
    /// Returns `None`, leaving the profile untouched, unless the item owns an
    /// estimate with both actual timestamps.
    pub fn learn(&self, profile: &mut PerformerProfile, item: &WorkItem) -> Option<LearningOutcome> {
        let estimate = item.estimate.as_ref()?;
        let actual_hours = estimate.actual_hours()?;
        let accuracy = estimate.accuracy()?;

        Self::fold(profile.by_work_type.entry(item.work_type).or_default(), actual_hours);
        Self::fold(profile.by_complexity.entry(item.complexity).or_default(), actual_hours);

        let completed = profile.total_completed as f64;
        profile.overall_accuracy = (profile.overall_accuracy * completed + accuracy) / (completed + 1.0);
        profile.total_completed += 1;
        profile.updated_at = chrono::Utc::now();

        info!(
            "Learned from {} for {}: actual {:.2}h vs estimated {:.2}h ({:.1}% accurate)",
            item.id, profile.performer_id, actual_hours, estimate.estimated_hours, accuracy
        );

        Some(LearningOutcome { actual_hours, accuracy })
    }
}
