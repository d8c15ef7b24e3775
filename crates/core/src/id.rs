//! Unique identifiers for Workcast entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a WorkItem.
///
/// Backed by a ULID, so ordering follows creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkItemId(Ulid);

impl WorkItemId {
    /// Generate a new WorkItemId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for WorkItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for WorkItemId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identifier of a performer (human or agent) doing the work.
///
/// Performers are named by whoever assigns the work, so this wraps the
/// external name rather than generating one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformerId(String);

impl PerformerId {
    /// Wrap an external performer name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PerformerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PerformerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PerformerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_id_round_trips_through_display() {
        let id = WorkItemId::new();
        let parsed: WorkItemId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_work_item_id_rejects_garbage() {
        assert!("not-a-ulid".parse::<WorkItemId>().is_err());
    }

    #[test]
    fn test_performer_id_serializes_as_plain_string() {
        let id = PerformerId::new("alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"alice\"");
        assert_eq!(id.as_str(), "alice");
    }
}
