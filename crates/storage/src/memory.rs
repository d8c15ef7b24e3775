//! In-memory storage.
//!
//! Clones share the same backing state, so a test can hand one clone to a
//! manager and inspect what was saved through another.

use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex;
use workcast_core::{PerformerProfile, WorkItem};
use super::{Storage, Result};

#[derive(Debug, Default)]
struct MemoryState {
    work_items: Vec<WorkItem>,
    profiles: Vec<PerformerProfile>,
    saves: usize,
}

/// Storage that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with records, as if loaded from disk.
    pub fn with_records(work_items: Vec<WorkItem>, profiles: Vec<PerformerProfile>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                work_items,
                profiles,
                saves: 0,
            })),
        }
    }

    /// How many times `save` has been called.
    pub async fn save_count(&self) -> usize {
        self.state.lock().await.saves
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load_work_items(&self) -> Result<Vec<WorkItem>> {
        Ok(self.state.lock().await.work_items.clone())
    }

    async fn load_profiles(&self) -> Result<Vec<PerformerProfile>> {
        Ok(self.state.lock().await.profiles.clone())
    }

    async fn save(&mut self, work_items: &[WorkItem], profiles: &[PerformerProfile]) -> Result<()> {
        let mut state = self.state.lock().await;
        state.work_items = work_items.to_vec();
        state.profiles = profiles.to_vec();
        state.saves += 1;
        Ok(())
    }
}
