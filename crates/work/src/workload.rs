//! Per-performer workload summaries.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use workcast_core::{PerformerId, Time, WorkItem, WorkItemId, WorkStatus};

/// An in-progress item with its schedule position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InProgressItem {
    /// Work item id
    pub id: WorkItemId,
    /// Work item title
    pub title: String,
    /// Estimated completion, if scheduled
    pub eta: Option<String>,
    /// Schedule progress in [0, 100], if scheduled
    pub progress: Option<f64>,
}

/// What one performer has on their plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerWorkload {
    /// Performer
    pub performer_id: PerformerId,
    /// Items assigned to the performer
    pub total_items: usize,
    /// Item count per status; every status is present
    pub by_status: BTreeMap<WorkStatus, usize>,
    /// Estimated hours across items that are not completed
    pub open_estimated_hours: f64,
    /// Items currently in progress
    pub in_progress: Vec<InProgressItem>,
    /// Overall estimate accuracy, 0 without history
    pub accuracy: f64,
}

impl PerformerWorkload {
    /// Summarize the items assigned to `performer_id` as of `now`.
    pub fn summarize<'a>(
        performer_id: PerformerId,
        items: impl IntoIterator<Item = &'a WorkItem>,
        accuracy: f64,
        now: Time,
    ) -> Self {
        let mut by_status: BTreeMap<WorkStatus, usize> =
            WorkStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        let mut total_items = 0;
        let mut open_estimated_hours = 0.0;
        let mut in_progress = Vec::new();

        for item in items {
            total_items += 1;
            *by_status.entry(item.status).or_insert(0) += 1;

            if !item.is_completed() {
                open_estimated_hours += item.estimated_hours();
            }

            if item.status == WorkStatus::InProgress {
                let estimate = item.estimate.as_ref();
                in_progress.push(InProgressItem {
                    id: item.id,
                    title: item.title.clone(),
                    eta: estimate.and_then(|e| e.eta()),
                    progress: estimate.and_then(|e| e.progress_at(now)),
                });
            }
        }

        Self {
            performer_id,
            total_items,
            by_status,
            open_estimated_hours,
            in_progress,
            accuracy,
        }
    }
}
