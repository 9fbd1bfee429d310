use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::profile::ProfileMeta;
use crate::models::resume::ResumeDocument;
use crate::persistence::backend::{ResumeStore, StoreError};

const PROFILES_FILE: &str = "profiles.json";
const RESUMES_DIR: &str = "resumes";

/// JSON-file store rooted at a data directory:
///
/// ```text
/// <root>/profiles.json        — Vec<ProfileMeta>
/// <root>/resumes/<id>.json    — ResumeDocument
/// ```
pub struct FileStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles on the profile index.
    index_lock: Mutex<()>,
}

impl FileStore {
    pub async fn new(root: PathBuf) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(root.join(RESUMES_DIR)).await?;
        info!("File store ready at {}", root.display());
        Ok(Self {
            root,
            index_lock: Mutex::new(()),
        })
    }

    fn document_path(&self, profile: Uuid) -> PathBuf {
        self.root.join(RESUMES_DIR).join(format!("{profile}.json"))
    }

    fn profiles_path(&self) -> PathBuf {
        self.root.join(PROFILES_FILE)
    }

    async fn read_profiles(&self) -> Result<Vec<ProfileMeta>, StoreError> {
        match tokio::fs::read(self.profiles_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes to a sibling temp file and renames it into place, so readers never
/// observe a partially written file.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl ResumeStore for FileStore {
    async fn load(&self, profile: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        match tokio::fs::read(self.document_path(profile)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(
        &self,
        profile: &ProfileMeta,
        document: &ResumeDocument,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        tokio::fs::create_dir_all(self.root.join(RESUMES_DIR)).await?;
        write_atomic(&self.document_path(profile.id), &bytes).await?;

        let _guard = self.index_lock.lock().await;
        let mut profiles = self.read_profiles().await?;
        let now = Utc::now();
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => {
                existing.name = profile.name.clone();
                existing.role = profile.role.clone();
                existing.updated_at = now;
            }
            None => {
                let mut meta = profile.clone();
                meta.updated_at = now;
                profiles.push(meta);
            }
        }
        write_atomic(&self.profiles_path(), &serde_json::to_vec_pretty(&profiles)?).await?;

        debug!(profile = %profile.id, bytes = bytes.len(), "Saved resume document");
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let _guard = self.index_lock.lock().await;
        let resumes = self.root.join(RESUMES_DIR);
        if tokio::fs::try_exists(&resumes).await? {
            tokio::fs::remove_dir_all(&resumes).await?;
        }
        tokio::fs::create_dir_all(&resumes).await?;
        let profiles = self.profiles_path();
        if tokio::fs::try_exists(&profiles).await? {
            tokio::fs::remove_file(&profiles).await?;
        }
        info!("Cleared all stored resume data under {}", self.root.display());
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileMeta>, StoreError> {
        let _guard = self.index_lock.lock().await;
        self.read_profiles().await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
