//! Work item model - the unit of work that gets estimated and scheduled.

use serde::{Deserialize, Serialize};
use crate::estimate::Estimate;
use crate::id::{PerformerId, WorkItemId};
use crate::Time;

/// A describable unit of work with type, complexity, status, and dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier
    pub id: WorkItemId,

    /// Short title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Kind of work
    pub work_type: WorkType,

    /// How hard the work is
    pub complexity: Complexity,

    /// Current status
    pub status: WorkStatus,

    /// Performer the work is assigned to
    pub assigned_to: Option<PerformerId>,

    /// Parent work item
    pub parent_id: Option<WorkItemId>,

    /// Work items that must complete first. May name ids this ledger
    /// has never seen.
    pub dependencies: Vec<WorkItemId>,

    /// The owned estimate, if one has been made
    pub estimate: Option<Estimate>,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl WorkItem {
    /// Create a not-started work item without an estimate.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        work_type: WorkType,
        complexity: Complexity,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: WorkItemId::new(),
            title: title.into(),
            description: description.into(),
            work_type,
            complexity,
            status: WorkStatus::NotStarted,
            assigned_to: None,
            parent_id: None,
            dependencies: Vec::new(),
            estimate: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the item has reached the completed state.
    pub fn is_completed(&self) -> bool {
        self.status == WorkStatus::Completed
    }

    /// Estimated duration in hours, zero when unestimated.
    pub fn estimated_hours(&self) -> f64 {
        self.estimate.as_ref().map_or(0.0, |e| e.estimated_hours)
    }
}

/// Kind of work, from a fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    /// Writing or changing code
    Coding,
    /// Investigation and reading
    Research,
    /// Writing docs
    Documentation,
    /// Design and architecture
    Design,
    /// Writing or running tests
    Testing,
    /// Reviewing others' work
    Review,
    /// Planning and breakdown
    Planning,
    /// Releasing and deploying
    Deployment,
    /// Upkeep and fixes
    Maintenance,
    /// Anything else
    Other,
}

impl WorkType {
    /// Every work type, in declaration order.
    pub const ALL: [WorkType; 10] = [
        WorkType::Coding,
        WorkType::Research,
        WorkType::Documentation,
        WorkType::Design,
        WorkType::Testing,
        WorkType::Review,
        WorkType::Planning,
        WorkType::Deployment,
        WorkType::Maintenance,
        WorkType::Other,
    ];

    /// Serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Coding => "coding",
            WorkType::Research => "research",
            WorkType::Documentation => "documentation",
            WorkType::Design => "design",
            WorkType::Testing => "testing",
            WorkType::Review => "review",
            WorkType::Planning => "planning",
            WorkType::Deployment => "deployment",
            WorkType::Maintenance => "maintenance",
            WorkType::Other => "other",
        }
    }
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkType {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        WorkType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| crate::ParseError::UnknownWorkType(s.to_string()))
    }
}

/// Complexity ordinal, 1 (trivial) through 5 (very complex).
///
/// Serialized as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Complexity {
    /// Under an hour
    Trivial,
    /// About an hour
    Simple,
    /// Half a day
    Moderate,
    /// About a day
    Complex,
    /// Two days or more
    VeryComplex,
}

impl Complexity {
    /// Every complexity level, lowest first.
    pub const ALL: [Complexity; 5] = [
        Complexity::Trivial,
        Complexity::Simple,
        Complexity::Moderate,
        Complexity::Complex,
        Complexity::VeryComplex,
    ];

    /// Ordinal in 1..=5.
    pub fn level(&self) -> u8 {
        match self {
            Complexity::Trivial => 1,
            Complexity::Simple => 2,
            Complexity::Moderate => 3,
            Complexity::Complex => 4,
            Complexity::VeryComplex => 5,
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Trivial => "trivial",
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
            Complexity::VeryComplex => "very complex",
        }
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Moderate
    }
}

impl TryFrom<u8> for Complexity {
    type Error = crate::ParseError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Complexity::Trivial),
            2 => Ok(Complexity::Simple),
            3 => Ok(Complexity::Moderate),
            4 => Ok(Complexity::Complex),
            5 => Ok(Complexity::VeryComplex),
            other => Err(crate::ParseError::UnknownComplexity(other.to_string())),
        }
    }
}

impl From<Complexity> for u8 {
    fn from(c: Complexity) -> Self {
        c.level()
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.level(), self.label())
    }
}

impl std::str::FromStr for Complexity {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_lowercase();
        if let Ok(level) = raw.parse::<u8>() {
            return Complexity::try_from(level);
        }
        let normalized = raw.replace(['_', '-'], " ");
        Complexity::ALL
            .into_iter()
            .find(|c| c.label() == normalized)
            .ok_or_else(|| crate::ParseError::UnknownComplexity(s.to_string()))
    }
}

/// Lifecycle status of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Created, not yet picked up
    NotStarted,
    /// Currently being worked on
    InProgress,
    /// Finished
    Completed,
    /// Waiting on something outside the performer's control
    Blocked,
    /// Running behind its schedule
    Delayed,
}

impl WorkStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [WorkStatus; 5] = [
        WorkStatus::NotStarted,
        WorkStatus::InProgress,
        WorkStatus::Completed,
        WorkStatus::Blocked,
        WorkStatus::Delayed,
    ];

    /// Serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::NotStarted => "not_started",
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Completed => "completed",
            WorkStatus::Blocked => "blocked",
            WorkStatus::Delayed => "delayed",
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase().replace('-', "_");
        WorkStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == tag)
            .ok_or_else(|| crate::ParseError::UnknownStatus(s.to_string()))
    }
}
