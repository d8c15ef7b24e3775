//! Performer profiles - running statistics used to calibrate estimates.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::id::PerformerId;
use crate::work_item::{Complexity, WorkType};
use crate::Time;

/// Running mean and dispersion of actual durations, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunningStats {
    /// Mean actual duration
    pub mean: f64,

    /// Standard-deviation-like spread
    pub dispersion: f64,

    /// Number of completions folded in
    pub count: u64,
}

impl RunningStats {
    /// Whether the mean is backed by at least one sample.
    pub fn has_samples(&self) -> bool {
        self.count > 0
    }

    /// Whether the dispersion is backed by more than one sample.
    pub fn has_spread(&self) -> bool {
        self.count > 1
    }
}

/// Per-performer statistics, keyed by work type and by complexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerProfile {
    /// Whose profile this is
    pub performer_id: PerformerId,

    /// Stats per work type
    pub by_work_type: BTreeMap<WorkType, RunningStats>,

    /// Stats per complexity level
    pub by_complexity: BTreeMap<Complexity, RunningStats>,

    /// Running mean of estimate accuracy, in [0, 100]
    pub overall_accuracy: f64,

    /// Completions folded into this profile
    pub total_completed: u64,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl PerformerProfile {
    /// An empty profile.
    pub fn new(performer_id: PerformerId) -> Self {
        let now = chrono::Utc::now();
        Self {
            performer_id,
            by_work_type: BTreeMap::new(),
            by_complexity: BTreeMap::new(),
            overall_accuracy: 0.0,
            total_completed: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stats for a work type; empty when never observed.
    pub fn work_type_stats(&self, work_type: WorkType) -> RunningStats {
        self.by_work_type.get(&work_type).copied().unwrap_or_default()
    }

    /// Stats for a complexity level; empty when never observed.
    pub fn complexity_stats(&self, complexity: Complexity) -> RunningStats {
        self.by_complexity.get(&complexity).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stats_are_empty() {
        let profile = PerformerProfile::new(PerformerId::new("bob"));
        let stats = profile.work_type_stats(WorkType::Coding);
        assert!(!stats.has_samples());
        assert!(!stats.has_spread());
        assert_eq!(profile.complexity_stats(Complexity::Simple), RunningStats::default());
    }

    #[test]
    fn test_profile_json_keys() {
        let mut profile = PerformerProfile::new(PerformerId::new("bob"));
        profile.by_work_type.insert(
            WorkType::Review,
            RunningStats { mean: 2.0, dispersion: 0.5, count: 3 },
        );
        profile.by_complexity.insert(
            Complexity::Complex,
            RunningStats { mean: 8.0, dispersion: 0.0, count: 1 },
        );

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["by_work_type"].get("review").is_some());
        assert!(json["by_complexity"].get("4").is_some());

        let back: PerformerProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
