//! Duration estimation.

use workcast_core::{
    Complexity, Estimate, PerformerId, PerformerProfile, WorkItem, WorkItemId, WorkStatus,
};
use tracing::debug;

use crate::confidence::{select_dispersion, ConfidenceInterval};
use crate::config::EstimationConfig;

/// Smallest duration an estimate can carry, one minute in hours.
const MIN_ESTIMATE_HOURS: f64 = 1.0 / 60.0;

/// Fallback hours for a complexity level when the performer has no history.
pub fn prior_hours(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Trivial => 0.5,
        Complexity::Simple => 1.0,
        Complexity::Moderate => 4.0,
        Complexity::Complex => 8.0,
        Complexity::VeryComplex => 16.0,
    }
}

/// Count dependencies that are not completed.
///
/// `status_of` returns `None` for ids it does not know; those count as unmet.
pub fn unmet_dependencies<F>(dependencies: &[WorkItemId], status_of: F) -> usize
where
    F: Fn(&WorkItemId) -> Option<WorkStatus>,
{
    dependencies
        .iter()
        .filter(|id| status_of(id) != Some(WorkStatus::Completed))
        .count()
}

/// Duration estimator.
///
/// Turns a performer's history into a point estimate, inflates it for unmet
/// dependencies, and wraps it in a confidence interval.
#[derive(Debug, Clone, Default)]
pub struct DurationEstimator {
    config: EstimationConfig,
}

impl DurationEstimator {
    /// Create an estimator.
    pub fn new(config: EstimationConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    /// Point estimate from history alone, in hours.
    ///
    /// Averages the work-type and complexity means when both have samples,
    /// uses whichever one does otherwise, and falls back to the prior.
    pub fn base_hours(&self, item: &WorkItem, profile: Option<&PerformerProfile>) -> f64 {
        let Some(profile) = profile else {
            return prior_hours(item.complexity);
        };

        let by_type = profile.work_type_stats(item.work_type);
        let by_complexity = profile.complexity_stats(item.complexity);

        match (by_type.has_samples(), by_complexity.has_samples()) {
            (true, true) => (by_type.mean + by_complexity.mean) / 2.0,
            (true, false) => by_type.mean,
            (false, true) => by_complexity.mean,
            (false, false) => prior_hours(item.complexity),
        }
    }

    /// Risk multiplier for `unmet` incomplete dependencies.
    pub fn dependency_factor(&self, unmet: usize) -> f64 {
        if unmet == 0 {
            return 1.0;
        }
        1.0 + self.config.dependency_penalty * unmet as f64
    }

    /// Produce an estimate for `item` as performed by `performer_id`.
    ///
    /// `profile` must be that performer's profile, if any. `unmet` is the
    /// number of dependencies not yet completed. The point estimate never
    /// drops below the lower bound floor, so a history of zero-length work
    /// still yields a positive duration and an ordered interval.
    pub fn estimate(
        &self,
        item: &WorkItem,
        performer_id: PerformerId,
        profile: Option<&PerformerProfile>,
        unmet: usize,
        confidence: f64,
    ) -> Estimate {
        let base = self.base_hours(item, profile);
        let floor = self.config.min_lower_bound.max(MIN_ESTIMATE_HOURS);
        let hours = (base * self.dependency_factor(unmet)).max(floor);

        let dispersion = select_dispersion(hours, item.work_type, item.complexity, profile);
        let interval =
            ConfidenceInterval::around(hours, dispersion, confidence, self.config.min_lower_bound);

        debug!(
            "Estimated {} for {}: base {:.2}h, {} unmet deps, {:.2}h [{:.2}, {:.2}] at {}",
            item.id, performer_id, base, unmet, hours, interval.lower, interval.upper, confidence
        );

        Estimate::new(item.id, performer_id, hours, confidence, interval.bounds())
    }
}
