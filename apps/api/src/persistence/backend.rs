use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::profile::ProfileMeta;
use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage backend for resume documents, keyed by profile.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Loads a profile's document. `None` means nothing was saved yet.
    async fn load(&self, profile: Uuid) -> Result<Option<ResumeDocument>, StoreError>;

    /// Writes a profile's document and upserts its index entry.
    async fn save(&self, profile: &ProfileMeta, document: &ResumeDocument)
        -> Result<(), StoreError>;

    /// Removes every stored document and the profile index.
    async fn clear_all(&self) -> Result<(), StoreError>;

    /// Lists the profile index.
    async fn list_profiles(&self) -> Result<Vec<ProfileMeta>, StoreError>;
}
