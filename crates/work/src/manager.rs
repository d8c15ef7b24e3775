//! Work management service.
//!
//! [`WorkManager`] owns the work item table and the performer profile table.
//! Every operation is a synchronous computation over that in-memory state;
//! only [`WorkManager::load`] and [`WorkManager::flush`] touch storage, and
//! nothing is written until the caller flushes.
//!
//! Mutations take `&mut self`. To share a manager between tasks, wrap it in
//! `Arc<tokio::sync::Mutex<_>>`.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use workcast_core::{
    Complexity, Estimate, PerformerId, PerformerProfile, Time, WorkItem, WorkItemId, WorkStatus,
    WorkType,
};
use workcast_progress::{
    unmet_dependencies, CriticalPath, CriticalPathAnalyzer, DurationEstimator, EstimationConfig,
    ProfileLearner, Scheduler,
};
use workcast_storage::Storage;

use crate::error::{Result, WorkError};
use crate::workload::PerformerWorkload;

/// Parameters for creating a work item.
#[derive(Debug, Clone)]
pub struct WorkItemSpec {
    /// Short title
    pub title: String,
    /// Detailed description
    pub description: String,
    /// Kind of work
    pub work_type: WorkType,
    /// How hard the work is
    pub complexity: Complexity,
    /// Performer to assign
    pub assigned_to: Option<PerformerId>,
    /// Parent item
    pub parent_id: Option<WorkItemId>,
    /// Items that must complete first
    pub dependencies: Vec<WorkItemId>,
}

impl WorkItemSpec {
    /// Spec with no performer, parent or dependencies.
    pub fn new(title: impl Into<String>, work_type: WorkType, complexity: Complexity) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            work_type,
            complexity,
            assigned_to: None,
            parent_id: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Assign a performer.
    pub fn with_performer(mut self, performer: impl Into<PerformerId>) -> Self {
        self.assigned_to = Some(performer.into());
        self
    }

    /// Set the parent item.
    pub fn with_parent(mut self, parent: WorkItemId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Set the dependencies.
    pub fn with_dependencies(mut self, dependencies: Vec<WorkItemId>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// The work ledger.
pub struct WorkManager<S: Storage> {
    storage: S,
    items: BTreeMap<WorkItemId, WorkItem>,
    profiles: BTreeMap<PerformerId, PerformerProfile>,
    estimator: DurationEstimator,
    scheduler: Scheduler,
    learner: ProfileLearner,
    analyzer: CriticalPathAnalyzer,
    dirty: bool,
}

impl<S: Storage> WorkManager<S> {
    /// Create an empty ledger backed by `storage`.
    pub fn new(storage: S, config: EstimationConfig) -> Self {
        Self {
            storage,
            items: BTreeMap::new(),
            profiles: BTreeMap::new(),
            estimator: DurationEstimator::new(config),
            scheduler: Scheduler::new(),
            learner: ProfileLearner::new(),
            analyzer: CriticalPathAnalyzer::new(),
            dirty: false,
        }
    }

    /// Create a ledger from whatever `storage` holds.
    pub async fn load(storage: S, config: EstimationConfig) -> Result<Self> {
        let items = storage.load_work_items().await?;
        let profiles = storage.load_profiles().await?;
        info!("Loaded {} work items and {} profiles", items.len(), profiles.len());

        let mut manager = Self::new(storage, config);
        manager.items = items.into_iter().map(|i| (i.id, i)).collect();
        manager.profiles = profiles
            .into_iter()
            .map(|p| (p.performer_id.clone(), p))
            .collect();
        Ok(manager)
    }

    /// Persist both tables.
    ///
    /// A storage failure is logged and swallowed: the in-memory state stays
    /// authoritative and the ledger stays dirty so the next flush retries.
    /// Returns whether the save succeeded.
    pub async fn flush(&mut self) -> bool {
        let items: Vec<WorkItem> = self.items.values().cloned().collect();
        let profiles: Vec<PerformerProfile> = self.profiles.values().cloned().collect();

        match self.storage.save(&items, &profiles).await {
            Ok(()) => {
                self.dirty = false;
                info!("Flushed {} work items and {} profiles", items.len(), profiles.len());
                true
            }
            Err(e) => {
                warn!("Failed to persist work ledger, keeping in-memory state: {}", e);
                false
            }
        }
    }

    /// Whether there are mutations not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Estimation configuration.
    pub fn config(&self) -> &EstimationConfig {
        self.estimator.config()
    }

    // === Mutations ===

    /// Create a not-started work item.
    pub fn create_work_item(&mut self, spec: WorkItemSpec) -> WorkItem {
        let mut item = WorkItem::new(spec.title, spec.description, spec.work_type, spec.complexity);
        item.assigned_to = spec.assigned_to;
        item.parent_id = spec.parent_id;
        item.dependencies = spec.dependencies;

        debug!("Created work item {} ({})", item.id, item.title);
        self.items.insert(item.id, item.clone());
        self.dirty = true;
        item
    }

    /// Estimate `item_id` as performed by `performer_id`.
    ///
    /// Replaces any previous estimate. Actual start/completion already
    /// recorded on the old estimate carry over; its schedule does not.
    pub fn estimate(
        &mut self,
        item_id: WorkItemId,
        performer_id: PerformerId,
        confidence: f64,
    ) -> Result<Estimate> {
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(WorkError::InvalidInput(format!(
                "confidence level must be in (0, 1], got {}",
                confidence
            )));
        }

        let item = self.items.get(&item_id).ok_or_else(|| not_found(item_id))?;
        let unmet = unmet_dependencies(&item.dependencies, |id| {
            self.items.get(id).map(|dep| dep.status)
        });
        let profile = self.profiles.get(&performer_id);

        let mut estimate = self.estimator.estimate(item, performer_id, profile, unmet, confidence);

        let item = self.items.get_mut(&item_id).ok_or_else(|| not_found(item_id))?;
        if let Some(previous) = item.estimate.take() {
            estimate.actual_start = previous.actual_start;
            estimate.actual_completion = previous.actual_completion;
        }
        item.estimate = Some(estimate.clone());
        item.updated_at = chrono::Utc::now();
        self.dirty = true;

        Ok(estimate)
    }

    /// Estimate at the configured default confidence level.
    pub fn estimate_default(
        &mut self,
        item_id: WorkItemId,
        performer_id: PerformerId,
    ) -> Result<Estimate> {
        let confidence = self.config().default_confidence;
        self.estimate(item_id, performer_id, confidence)
    }

    /// Anchor the item's estimate at `start`, or now.
    pub fn schedule(&mut self, item_id: WorkItemId, start: Option<Time>) -> Result<()> {
        let item = self.items.get_mut(&item_id).ok_or_else(|| not_found(item_id))?;
        let estimate = item.estimate.as_mut().ok_or_else(|| {
            WorkError::InvalidState(format!("work item {} has no estimate to schedule", item_id))
        })?;

        let start = start.unwrap_or_else(chrono::Utc::now);
        self.scheduler.schedule(estimate, start);
        debug!("Scheduled {} from {} to {:?}", item_id, start, estimate.estimated_completion);

        item.updated_at = chrono::Utc::now();
        self.dirty = true;
        Ok(())
    }

    /// Change an item's status, effective now.
    pub fn update_status(&mut self, item_id: WorkItemId, status: WorkStatus) -> Result<()> {
        self.update_status_at(item_id, status, chrono::Utc::now())
    }

    /// Change an item's status, effective at `now`.
    ///
    /// Moving to in-progress records the actual start once. Completing
    /// records the actual completion once and, when the item is assigned
    /// and was started, folds it into the assignee's profile. Setting the
    /// status an item already has does nothing, so repeated completion
    /// signals learn only once.
    pub fn update_status_at(&mut self, item_id: WorkItemId, status: WorkStatus, now: Time) -> Result<()> {
        let item = self.items.get_mut(&item_id).ok_or_else(|| not_found(item_id))?;

        if item.status == status {
            debug!("Work item {} already {}, ignoring", item_id, status);
            return Ok(());
        }

        debug!("Work item {}: {} -> {}", item_id, item.status, status);
        item.status = status;
        item.updated_at = now;
        self.dirty = true;

        match status {
            WorkStatus::InProgress => {
                if let Some(estimate) = item.estimate.as_mut() {
                    estimate.actual_start.get_or_insert(now);
                }
            }
            WorkStatus::Completed => {
                let Some(estimate) = item.estimate.as_mut() else {
                    return Ok(());
                };
                if estimate.actual_completion.is_some() {
                    debug!("Work item {} was already completed once, not relearning", item_id);
                    return Ok(());
                }
                estimate.actual_completion = Some(now);

                let Some(performer) = item.assigned_to.clone() else {
                    return Ok(());
                };
                if estimate.actual_hours().is_none() {
                    debug!("Work item {} completed without a recorded start", item_id);
                    return Ok(());
                }

                let profile = self
                    .profiles
                    .entry(performer.clone())
                    .or_insert_with(|| PerformerProfile::new(performer));
                self.learner.learn(profile, item);
            }
            WorkStatus::NotStarted | WorkStatus::Blocked | WorkStatus::Delayed => {}
        }

        Ok(())
    }

    /// Assign the item to a performer, or clear the assignment.
    pub fn assign(&mut self, item_id: WorkItemId, performer: Option<PerformerId>) -> Result<()> {
        let item = self.items.get_mut(&item_id).ok_or_else(|| not_found(item_id))?;
        item.assigned_to = performer;
        item.updated_at = chrono::Utc::now();
        self.dirty = true;
        Ok(())
    }

    // === Queries ===

    /// Look up a work item.
    pub fn get_item(&self, item_id: WorkItemId) -> Option<&WorkItem> {
        self.items.get(&item_id)
    }

    /// Look up a performer profile.
    pub fn get_profile(&self, performer_id: &PerformerId) -> Option<&PerformerProfile> {
        self.profiles.get(performer_id)
    }

    /// Every work item, ordered by id.
    pub fn get_all_items(&self) -> Vec<&WorkItem> {
        self.items.values().collect()
    }

    /// Every profile, ordered by performer.
    pub fn get_all_profiles(&self) -> Vec<&PerformerProfile> {
        self.profiles.values().collect()
    }

    /// Items assigned to `performer_id`, ordered by id.
    pub fn get_performer_items(&self, performer_id: &PerformerId) -> Vec<&WorkItem> {
        self.items
            .values()
            .filter(|i| i.assigned_to.as_ref() == Some(performer_id))
            .collect()
    }

    /// Estimated completion of an item.
    ///
    /// `Ok(None)` means the item exists but is not estimated and scheduled.
    pub fn get_eta(&self, item_id: WorkItemId) -> Result<Option<String>> {
        let item = self.items.get(&item_id).ok_or_else(|| not_found(item_id))?;
        Ok(item.estimate.as_ref().and_then(Estimate::eta))
    }

    /// Schedule progress of an item, now.
    pub fn get_progress(&self, item_id: WorkItemId) -> Result<Option<f64>> {
        self.get_progress_at(item_id, chrono::Utc::now())
    }

    /// Schedule progress of an item as of `now`.
    ///
    /// `Ok(None)` means the item exists but is not estimated and scheduled.
    pub fn get_progress_at(&self, item_id: WorkItemId, now: Time) -> Result<Option<f64>> {
        let item = self.items.get(&item_id).ok_or_else(|| not_found(item_id))?;
        Ok(item.estimate.as_ref().and_then(|e| e.progress_at(now)))
    }

    /// A performer's overall accuracy; 0 for unknown performers.
    pub fn get_accuracy(&self, performer_id: &PerformerId) -> f64 {
        self.profiles
            .get(performer_id)
            .map_or(0.0, |p| p.overall_accuracy)
    }

    /// Workload for each performer, in the order given.
    pub fn get_team_workload(&self, performer_ids: &[PerformerId]) -> Vec<PerformerWorkload> {
        self.get_team_workload_at(performer_ids, chrono::Utc::now())
    }

    /// Workload for each performer as of `now`.
    pub fn get_team_workload_at(&self, performer_ids: &[PerformerId], now: Time) -> Vec<PerformerWorkload> {
        performer_ids
            .iter()
            .map(|performer| {
                PerformerWorkload::summarize(
                    performer.clone(),
                    self.get_performer_items(performer),
                    self.get_accuracy(performer),
                    now,
                )
            })
            .collect()
    }

    /// Longest dependency chain through `item_ids`.
    ///
    /// Every id must name a known work item.
    pub fn get_critical_path(&self, item_ids: &[WorkItemId]) -> Result<CriticalPath> {
        if let Some(missing) = item_ids.iter().find(|id| !self.items.contains_key(*id)) {
            return Err(not_found(*missing));
        }
        Ok(self.analyzer.analyze(item_ids, |id| self.items.get(id)))
    }
}

fn not_found(item_id: WorkItemId) -> WorkError {
    WorkError::NotFound(format!("work item {}", item_id))
}
