//! Critical path analysis over a set of work items.
//!
//! A forward pass computes earliest start/finish for every item whose
//! dependencies (restricted to the requested set) can be resolved, then a
//! backward trace walks from the latest-finishing item through the
//! dependencies that determined its start.
//!
//! Items on or behind a dependency cycle never resolve in the forward pass.
//! They are reported in [`CriticalPath::excluded`] rather than failing the
//! whole analysis.

use std::collections::{BTreeMap, HashMap, HashSet};
use serde::{Deserialize, Serialize};
use workcast_core::{WorkItem, WorkItemId};
use tracing::{debug, warn};

/// Tolerance when matching finish times against start times.
const EPSILON: f64 = 1e-9;

/// Earliest timing of one item, in hours from the start of the subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTiming {
    /// Earliest the item can start
    pub earliest_start: f64,
    /// Earliest the item can finish
    pub earliest_finish: f64,
}

/// Result of a critical path analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    /// The longest chain, first item first
    pub items: Vec<WorkItemId>,
    /// Finish time of the chain, hours
    pub total_hours: f64,
    /// Timing of every item the forward pass resolved
    pub timings: BTreeMap<WorkItemId, NodeTiming>,
    /// Requested items left out: unknown ids and items on or behind a cycle
    pub excluded: Vec<WorkItemId>,
}

impl CriticalPath {
    /// Whether the analysis found no chain at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Computes the longest duration-weighted dependency chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalPathAnalyzer;

impl CriticalPathAnalyzer {
    /// Create an analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Analyze `ids`, resolving each through `lookup`.
    ///
    /// Ids `lookup` does not know are excluded. Unestimated items take zero
    /// time. Dependencies outside `ids` are ignored. Duplicate ids are
    /// analyzed once, and ties are broken by the order of `ids`.
    pub fn analyze<'a, F>(&self, ids: &[WorkItemId], lookup: F) -> CriticalPath
    where
        F: Fn(&WorkItemId) -> Option<&'a WorkItem>,
    {
        let mut seen = HashSet::new();
        let mut unknown = Vec::new();
        let mut known: Vec<(WorkItemId, &'a WorkItem)> = Vec::new();
        for id in ids {
            if !seen.insert(*id) {
                continue;
            }
            match lookup(id) {
                Some(item) => known.push((*id, item)),
                None => unknown.push(*id),
            }
        }
        if !unknown.is_empty() {
            warn!(
                "Critical path excluded {} unknown item(s): {:?}",
                unknown.len(),
                unknown.iter().map(|id| id.to_string()).collect::<Vec<_>>()
            );
        }

        let order: Vec<WorkItemId> = known.iter().map(|(id, _)| *id).collect();
        let in_graph: HashSet<WorkItemId> = order.iter().copied().collect();

        // Restrict the graph to the requested, known set
        let mut durations: HashMap<WorkItemId, f64> = HashMap::new();
        let mut deps: HashMap<WorkItemId, Vec<WorkItemId>> = HashMap::new();
        for (id, item) in &known {
            durations.insert(*id, item.estimated_hours());

            let mut in_set: Vec<WorkItemId> = Vec::new();
            for dep in &item.dependencies {
                if in_graph.contains(dep) && !in_set.contains(dep) {
                    in_set.push(*dep);
                }
            }
            deps.insert(*id, in_set);
        }

        let timings = forward_pass(&order, &durations, &deps);

        let cyclic: Vec<WorkItemId> =
            order.iter().copied().filter(|id| !timings.contains_key(id)).collect();
        if !cyclic.is_empty() {
            warn!(
                "Critical path excluded {} item(s) with cyclic dependencies: {:?}",
                cyclic.len(),
                cyclic.iter().map(|id| id.to_string()).collect::<Vec<_>>()
            );
        }

        let mut excluded = unknown;
        excluded.extend(cyclic);

        let Some(total_hours) = timings
            .values()
            .map(|t| t.earliest_finish)
            .fold(None, |max: Option<f64>, f| Some(max.map_or(f, |m| m.max(f))))
        else {
            return CriticalPath { excluded, ..Default::default() };
        };

        let items = backward_trace(&order, &deps, &timings, total_hours);
        debug!("Critical path of {} item(s), {:.2}h", items.len(), total_hours);

        CriticalPath {
            items,
            total_hours,
            timings: timings.into_iter().collect(),
            excluded,
        }
    }
}

/// Resolve earliest timings until a pass makes no progress.
fn forward_pass(
    order: &[WorkItemId],
    durations: &HashMap<WorkItemId, f64>,
    deps: &HashMap<WorkItemId, Vec<WorkItemId>>,
) -> HashMap<WorkItemId, NodeTiming> {
    let mut timings: HashMap<WorkItemId, NodeTiming> = HashMap::new();

    loop {
        let mut progressed = false;

        for id in order {
            if timings.contains_key(id) {
                continue;
            }

            let item_deps = deps.get(id).map(Vec::as_slice).unwrap_or(&[]);
            if !item_deps.iter().all(|d| timings.contains_key(d)) {
                continue;
            }

            let earliest_start = item_deps
                .iter()
                .filter_map(|d| timings.get(d))
                .map(|t| t.earliest_finish)
                .fold(0.0, f64::max);
            let duration = durations.get(id).copied().unwrap_or(0.0);

            timings.insert(
                *id,
                NodeTiming {
                    earliest_start,
                    earliest_finish: earliest_start + duration,
                },
            );
            progressed = true;
        }

        if !progressed {
            return timings;
        }
    }
}

/// Walk back from the items finishing at `end` to a start node.
fn backward_trace(
    order: &[WorkItemId],
    deps: &HashMap<WorkItemId, Vec<WorkItemId>>,
    timings: &HashMap<WorkItemId, NodeTiming>,
    end: f64,
) -> Vec<WorkItemId> {
    let mut candidates: Vec<WorkItemId> = order
        .iter()
        .copied()
        .filter(|id| timings.get(id).is_some_and(|t| (t.earliest_finish - end).abs() < EPSILON))
        .collect();

    let mut path = Vec::new();
    while let Some(chosen) = latest_finishing(&candidates, timings) {
        path.push(chosen);

        let start = timings[&chosen].earliest_start;
        candidates = deps
            .get(&chosen)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|d| timings.get(d).is_some_and(|t| (t.earliest_finish - start).abs() < EPSILON))
            .collect();

        // A cycle cannot reach here, but never revisit a node.
        candidates.retain(|c| !path.contains(c));
    }

    path.reverse();
    path
}

/// Candidate with the greatest earliest finish; the first one wins ties.
fn latest_finishing(
    candidates: &[WorkItemId],
    timings: &HashMap<WorkItemId, NodeTiming>,
) -> Option<WorkItemId> {
    let mut best: Option<(WorkItemId, f64)> = None;
    for id in candidates {
        let finish = timings[id].earliest_finish;
        if best.map_or(true, |(_, f)| finish > f + EPSILON) {
            best = Some((*id, finish));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use workcast_core::{Complexity, Estimate, PerformerId, WorkType};

    fn item(hours: Option<f64>, deps: &[WorkItemId]) -> WorkItem {
        let mut item = WorkItem::new("Step", "", WorkType::Coding, Complexity::Moderate);
        item.dependencies = deps.to_vec();
        item.estimate = hours.map(|h| {
            Estimate::new(item.id, PerformerId::new("hana"), h, 0.8, (h / 2.0, h * 2.0))
        });
        item
    }

    fn table(items: &[&WorkItem]) -> HashMap<WorkItemId, WorkItem> {
        items.iter().map(|i| (i.id, (*i).clone())).collect()
    }

    #[test]
    fn test_empty_input() {
        let items: HashMap<WorkItemId, WorkItem> = HashMap::new();
        let path = CriticalPathAnalyzer::new().analyze(&[], |id| items.get(id));

        assert!(path.is_empty());
        assert_eq!(path.total_hours, 0.0);
        assert!(path.excluded.is_empty());
    }

    #[test]
    fn test_longest_branch_wins() {
        let a = item(Some(2.0), &[]);
        let b = item(Some(3.0), &[a.id]);
        let c = item(Some(1.0), &[a.id]);
        let items = table(&[&a, &b, &c]);

        let path = CriticalPathAnalyzer::new().analyze(&[a.id, b.id, c.id], |id| items.get(id));

        assert_eq!(path.items, vec![a.id, b.id]);
        assert_eq!(path.total_hours, 5.0);
        assert_eq!(
            path.timings[&c.id],
            NodeTiming { earliest_start: 2.0, earliest_finish: 3.0 }
        );
    }

    #[test]
    fn test_input_order_does_not_matter_for_chain() {
        let a = item(Some(2.0), &[]);
        let b = item(Some(3.0), &[a.id]);
        let c = item(Some(4.0), &[b.id]);
        let items = table(&[&a, &b, &c]);

        let path = CriticalPathAnalyzer::new().analyze(&[c.id, b.id, a.id], |id| items.get(id));

        assert_eq!(path.items, vec![a.id, b.id, c.id]);
        assert_eq!(path.total_hours, 9.0);
    }

    #[test]
    fn test_out_of_set_dependencies_are_ignored() {
        let outside = item(Some(50.0), &[]);
        let a = item(Some(1.0), &[outside.id]);
        let b = item(Some(2.0), &[a.id, WorkItemId::new()]);
        let items = table(&[&outside, &a, &b]);

        let path = CriticalPathAnalyzer::new().analyze(&[a.id, b.id], |id| items.get(id));

        assert_eq!(path.items, vec![a.id, b.id]);
        assert_eq!(path.total_hours, 3.0);
    }

    #[test]
    fn test_unestimated_items_take_no_time() {
        let a = item(None, &[]);
        let b = item(Some(2.0), &[a.id]);
        let items = table(&[&a, &b]);

        let path = CriticalPathAnalyzer::new().analyze(&[a.id, b.id], |id| items.get(id));

        assert_eq!(path.items, vec![a.id, b.id]);
        assert_eq!(path.total_hours, 2.0);
    }

    #[test]
    fn test_cycle_is_excluded_not_fatal() {
        let mut x = item(Some(1.0), &[]);
        let y = item(Some(1.0), &[x.id]);
        x.dependencies = vec![y.id];
        let z = item(Some(4.0), &[]);
        let after = item(Some(1.0), &[y.id]);
        let items = table(&[&x, &y, &z, &after]);

        let path = CriticalPathAnalyzer::new()
            .analyze(&[x.id, y.id, z.id, after.id], |id| items.get(id));

        assert_eq!(path.items, vec![z.id]);
        assert_eq!(path.total_hours, 4.0);
        assert_eq!(path.excluded, vec![x.id, y.id, after.id]);
    }

    #[test]
    fn test_only_cycle_yields_empty_path() {
        let mut x = item(Some(1.0), &[]);
        let y = item(Some(1.0), &[x.id]);
        x.dependencies = vec![y.id];
        let items = table(&[&x, &y]);

        let path = CriticalPathAnalyzer::new().analyze(&[x.id, y.id], |id| items.get(id));

        assert!(path.is_empty());
        assert_eq!(path.excluded.len(), 2);
    }

    #[test]
    fn test_tie_goes_to_first_requested() {
        let a = item(Some(2.0), &[]);
        let b = item(Some(2.0), &[]);
        let items = table(&[&a, &b]);

        let path = CriticalPathAnalyzer::new().analyze(&[b.id, a.id, b.id], |id| items.get(id));

        assert_eq!(path.items, vec![b.id]);
        assert_eq!(path.timings.len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_excluded() {
        let a = item(Some(2.0), &[]);
        let ghost = WorkItemId::new();
        let b = item(Some(1.0), &[a.id, ghost]);
        let items = table(&[&a, &b]);

        let path = CriticalPathAnalyzer::new().analyze(&[ghost, a.id, b.id], |id| items.get(id));

        assert_eq!(path.items, vec![a.id, b.id]);
        assert_eq!(path.total_hours, 3.0);
        assert_eq!(path.excluded, vec![ghost]);
        assert!(!path.timings.contains_key(&ghost));

        let none: HashMap<WorkItemId, WorkItem> = HashMap::new();
        let path = CriticalPathAnalyzer::new().analyze(&[ghost], |id| none.get(id));
        assert!(path.is_empty());
        assert_eq!(path.excluded, vec![ghost]);
    }
}
