//! Estimate model - a duration prediction owned by one work item.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use crate::id::{PerformerId, WorkItemId};
use crate::Time;

/// Seconds per hour, used wherever hours meet wall-clock time.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// A probabilistic duration prediction bound to one work item and one performer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Owning work item
    pub work_item_id: WorkItemId,

    /// Performer whose profile produced the estimate
    pub performer_id: PerformerId,

    /// Point estimate in hours (always > 0)
    pub estimated_hours: f64,

    /// Requested confidence level in (0, 1]
    pub confidence_level: f64,

    /// Lower bound of the interval, hours
    pub lower_bound_hours: f64,

    /// Upper bound of the interval, hours
    pub upper_bound_hours: f64,

    /// Scheduled start
    pub estimated_start: Option<Time>,

    /// Scheduled completion
    pub estimated_completion: Option<Time>,

    /// When work actually started
    pub actual_start: Option<Time>,

    /// When work actually completed
    pub actual_completion: Option<Time>,

    /// When the estimate was made
    pub created_at: Time,
}

impl Estimate {
    /// Create an unscheduled estimate.
    pub fn new(
        work_item_id: WorkItemId,
        performer_id: PerformerId,
        estimated_hours: f64,
        confidence_level: f64,
        (lower_bound_hours, upper_bound_hours): (f64, f64),
    ) -> Self {
        Self {
            work_item_id,
            performer_id,
            estimated_hours,
            confidence_level,
            lower_bound_hours,
            upper_bound_hours,
            estimated_start: None,
            estimated_completion: None,
            actual_start: None,
            actual_completion: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// The estimated duration as a wall-clock span, rounded to the second.
    pub fn estimated_duration(&self) -> Duration {
        Duration::seconds((self.estimated_hours * SECONDS_PER_HOUR).round() as i64)
    }

    /// Whether both scheduled timestamps are present.
    pub fn is_scheduled(&self) -> bool {
        self.estimated_start.is_some() && self.estimated_completion.is_some()
    }

    /// Estimated completion rendered for display.
    pub fn eta(&self) -> Option<String> {
        self.estimated_completion
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
    }

    /// Time left until the scheduled completion, as of `now`. Never negative.
    pub fn time_remaining_at(&self, now: Time) -> Option<Duration> {
        let completion = self.estimated_completion?;
        Some((completion - now).max(Duration::zero()))
    }

    /// Time left until the scheduled completion.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining_at(chrono::Utc::now())
    }

    /// Schedule progress as of `now`, in [0, 100].
    ///
    /// Linear between the scheduled start and completion. Requires both.
    pub fn progress_at(&self, now: Time) -> Option<f64> {
        let start = self.estimated_start?;
        let completion = self.estimated_completion?;

        let total = (completion - start).num_milliseconds() as f64;
        if total <= 0.0 {
            return Some(if now >= start { 100.0 } else { 0.0 });
        }

        let elapsed = (now - start).num_milliseconds() as f64;
        Some((elapsed / total * 100.0).clamp(0.0, 100.0))
    }

    /// Schedule progress right now.
    pub fn progress(&self) -> Option<f64> {
        self.progress_at(chrono::Utc::now())
    }

    /// Actual duration in hours, once both actual timestamps exist.
    pub fn actual_hours(&self) -> Option<f64> {
        let start = self.actual_start?;
        let end = self.actual_completion?;
        Some((end - start).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_HOUR)
    }

    /// How close the estimate came to the actual duration, in [0, 100].
    pub fn accuracy(&self) -> Option<f64> {
        let actual = self.actual_hours()?;
        let estimated = self.estimated_hours;

        if actual == 0.0 {
            return Some(if estimated == 0.0 { 100.0 } else { 0.0 });
        }

        let error = (estimated - actual).abs() / actual;
        Some((100.0 * (1.0 - error)).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn estimate(hours: f64) -> Estimate {
        Estimate::new(WorkItemId::new(), PerformerId::new("alice"), hours, 0.8, (1.0, 2.0))
    }

    fn t0() -> Time {
        chrono::Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_progress_requires_both_timestamps() {
        let mut e = estimate(4.0);
        assert!(e.progress_at(t0()).is_none());

        e.estimated_start = Some(t0());
        assert!(e.progress_at(t0()).is_none());
    }

    #[test]
    fn test_progress_is_linear_and_clamped() {
        let mut e = estimate(4.0);
        e.estimated_start = Some(t0());
        e.estimated_completion = Some(t0() + Duration::hours(4));

        assert_eq!(e.progress_at(t0() - Duration::hours(1)), Some(0.0));
        assert_eq!(e.progress_at(t0()), Some(0.0));
        assert_eq!(e.progress_at(t0() + Duration::hours(1)), Some(25.0));
        assert_eq!(e.progress_at(t0() + Duration::hours(4)), Some(100.0));
        assert_eq!(e.progress_at(t0() + Duration::hours(9)), Some(100.0));
    }

    #[test]
    fn test_accuracy_needs_actuals() {
        let mut e = estimate(4.0);
        assert!(e.accuracy().is_none());

        e.actual_start = Some(t0());
        e.actual_completion = Some(t0() + Duration::hours(5));
        // |4 - 5| / 5 = 0.2
        assert!((e.accuracy().unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_floors_at_zero() {
        let mut e = estimate(30.0);
        e.actual_start = Some(t0());
        e.actual_completion = Some(t0() + Duration::hours(10));
        assert_eq!(e.accuracy(), Some(0.0));
    }

    #[test]
    fn test_accuracy_with_zero_actual() {
        let mut e = estimate(2.0);
        e.actual_start = Some(t0());
        e.actual_completion = Some(t0());
        assert_eq!(e.accuracy(), Some(0.0));

        e.estimated_hours = 0.0;
        assert_eq!(e.accuracy(), Some(100.0));
    }

    #[test]
    fn test_eta_and_remaining() {
        let mut e = estimate(2.0);
        assert!(e.eta().is_none());
        assert!(e.time_remaining_at(t0()).is_none());

        e.estimated_completion = Some(t0() + Duration::hours(2));
        assert_eq!(e.eta().as_deref(), Some("2026-03-02 11:00 UTC"));
        assert_eq!(e.time_remaining_at(t0()), Some(Duration::hours(2)));
        assert_eq!(e.time_remaining_at(t0() + Duration::hours(3)), Some(Duration::zero()));
    }

    #[test]
    fn test_estimated_duration_in_seconds() {
        assert_eq!(estimate(5.0).estimated_duration(), Duration::seconds(18_000));
        assert_eq!(estimate(0.5).estimated_duration(), Duration::seconds(1_800));
    }
}
