//! JSON file storage implementation.
//!
//! Stores the two collections as `work-items.json` and
//! `performer-profiles.json` under a root directory, plus a small
//! `meta.json` marker (version + updated_at) bumped on every save.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use workcast_core::{PerformerProfile, WorkItem};
use super::{Storage, Result};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

const WORK_ITEMS_FILE: &str = "work-items.json";
const PROFILES_FILE: &str = "performer-profiles.json";
const META_FILE: &str = "meta.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    version: Arc<Mutex<u64>>,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;

        let version = read_version(&root.join(META_FILE)).await;

        Ok(Self {
            root,
            version: Arc::new(Mutex::new(version)),
        })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of saves recorded in the meta marker.
    pub async fn version(&self) -> u64 {
        *self.version.lock().await
    }

    fn work_items_path(&self) -> PathBuf {
        self.root.join(WORK_ITEMS_FILE)
    }

    fn profiles_path(&self) -> PathBuf {
        self.root.join(PROFILES_FILE)
    }

    /// Increment the save version and write the meta marker.
    async fn bump_version(&self) -> Result<u64> {
        let mut version = self.version.lock().await;
        *version += 1;
        let meta = serde_json::json!({"version": *version, "updated_at": chrono::Utc::now()});
        write_atomic(&self.root.join(META_FILE), &serde_json::to_vec_pretty(&meta)?).await?;
        Ok(*version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_work_items(&self) -> Result<Vec<WorkItem>> {
        read_list(&self.work_items_path()).await
    }

    async fn load_profiles(&self) -> Result<Vec<PerformerProfile>> {
        read_list(&self.profiles_path()).await
    }

    async fn save(&mut self, work_items: &[WorkItem], profiles: &[PerformerProfile]) -> Result<()> {
        write_atomic(&self.work_items_path(), &serde_json::to_vec_pretty(work_items)?).await?;
        write_atomic(&self.profiles_path(), &serde_json::to_vec_pretty(profiles)?).await?;

        let version = self.bump_version().await?;
        debug!(
            "Saved {} work items and {} profiles (version {})",
            work_items.len(),
            profiles.len(),
            version
        );
        Ok(())
    }
}

async fn read_version(path: &Path) -> u64 {
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
            .ok()
            .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

async fn read_list<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write through a sibling temp file so readers never see a torn file.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use workcast_core::{Complexity, PerformerId, WorkType};

    #[tokio::test]
    async fn test_empty_root_loads_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(storage.load_work_items().await.unwrap().is_empty());
        assert!(storage.load_profiles().await.unwrap().is_empty());
        assert_eq!(storage.version().await, 0);
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let first = WorkItem::new("first", "", WorkType::Design, Complexity::Simple);
        let second = WorkItem::new("second", "", WorkType::Testing, Complexity::Complex);
        let profile = PerformerProfile::new(PerformerId::new("carol"));

        storage
            .save(&[second.clone(), first.clone()], &[profile.clone()])
            .await
            .unwrap();

        let items = storage.load_work_items().await.unwrap();
        assert_eq!(items, vec![second, first]);
        assert_eq!(storage.load_profiles().await.unwrap(), vec![profile]);
        assert_eq!(storage.version().await, 1);
    }

    #[tokio::test]
    async fn test_version_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = JsonStorage::new(dir.path()).await.unwrap();
            storage.save(&[], &[]).await.unwrap();
            storage.save(&[], &[]).await.unwrap();
        }

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        assert_eq!(reopened.version().await, 2);
        assert!(!dir.path().join("work-items.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(WORK_ITEMS_FILE), b"{not json").unwrap();

        let storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            storage.load_work_items().await,
            Err(crate::StorageError::Json(_))
        ));
    }
}
