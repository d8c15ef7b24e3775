//! Confidence intervals around a point estimate.
//!
//! The interval is a symmetric heuristic: `duration ± z × dispersion`, with
//! `z` looked up from a fixed quantile table. Dispersion is a scale taken
//! from the performer's history when there is enough of it, and synthesized
//! from complexity otherwise.

use serde::{Deserialize, Serialize};
use workcast_core::{Complexity, PerformerProfile, WorkType};

/// Confidence level → one-sided multiplier, ascending by level.
pub const QUANTILES: [(f64, f64); 7] = [
    (0.5, 0.67),
    (0.6, 0.84),
    (0.7, 1.04),
    (0.8, 1.28),
    (0.9, 1.645),
    (0.95, 1.96),
    (0.99, 2.576),
];

/// Bounds of an interval, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Half-width before the lower bound floor was applied
    pub margin: f64,
}

impl ConfidenceInterval {
    /// Interval for `duration` given a dispersion and confidence level.
    ///
    /// The lower bound never drops below `min_lower`.
    pub fn around(duration: f64, dispersion: f64, level: f64, min_lower: f64) -> Self {
        let margin = z_multiplier(level) * dispersion;
        Self {
            lower: (duration - margin).max(min_lower),
            upper: duration + margin,
            margin,
        }
    }

    /// `(lower, upper)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

/// Multiplier for the table level numerically closest to `level`.
///
/// Ties go to the lower table level.
pub fn z_multiplier(level: f64) -> f64 {
    let mut best = QUANTILES[0];
    for entry in QUANTILES.iter().skip(1) {
        if (entry.0 - level).abs() < (best.0 - level).abs() {
            best = *entry;
        }
    }
    best.1
}

/// Fraction of the duration used as dispersion when history is too thin.
pub fn synthetic_fraction(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Trivial => 0.2,
        Complexity::Simple => 0.3,
        Complexity::Moderate => 0.4,
        Complexity::Complex => 0.5,
        Complexity::VeryComplex => 0.6,
    }
}

/// Pick the dispersion for an interval.
///
/// Work-type history wins, then complexity history, each needing at least
/// two samples; otherwise a complexity-scaled share of `duration`.
pub fn select_dispersion(
    duration: f64,
    work_type: WorkType,
    complexity: Complexity,
    profile: Option<&PerformerProfile>,
) -> f64 {
    if let Some(profile) = profile {
        let by_type = profile.work_type_stats(work_type);
        if by_type.has_spread() {
            return by_type.dispersion;
        }

        let by_complexity = profile.complexity_stats(complexity);
        if by_complexity.has_spread() {
            return by_complexity.dispersion;
        }
    }

    duration * synthetic_fraction(complexity)
}
