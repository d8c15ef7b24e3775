//! Binding estimates to wall-clock time.

use chrono::Duration;
use workcast_core::{Estimate, Time, SECONDS_PER_HOUR};

/// Places estimates on the timeline.
///
/// Scheduling is plain assignment; it does not look at dependencies. Use
/// [`Scheduler::earliest_start_hint`] with a critical path timing to pick a
/// start that respects them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    /// Create a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Anchor `estimate` at `start`; completion follows from its duration.
    pub fn schedule(&self, estimate: &mut Estimate, start: Time) {
        estimate.estimated_start = Some(start);
        estimate.estimated_completion = Some(start + estimate.estimated_duration());
    }

    /// Wall-clock time `offset_hours` after `anchor`.
    ///
    /// Pairs with [`crate::NodeTiming::earliest_start`], which is an offset
    /// from the start of the analyzed subgraph.
    pub fn earliest_start_hint(&self, anchor: Time, offset_hours: f64) -> Time {
        anchor + Duration::seconds((offset_hours * SECONDS_PER_HOUR).round() as i64)
    }
}
