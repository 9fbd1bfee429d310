use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Notify, RwLock, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::profile::ProfileMeta;
use crate::models::resume::ResumeDocument;
use crate::persistence::backend::{ResumeStore, StoreError};

#[derive(Default)]
struct Inner {
    documents: HashMap<Uuid, ResumeDocument>,
    profiles: Vec<ProfileMeta>,
    writes: Vec<ResumeDocument>,
}

/// In-process store. Counts writes, can be switched into a failing mode, and
/// can hold saves and clears at a gate.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    fail_clears: AtomicBool,
    gate: RwLock<()>,
    started: Notify,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document without counting it as a save.
    pub fn with_document(self, profile: ProfileMeta, document: ResumeDocument) -> Self {
        {
            let mut inner = self.lock();
            inner.documents.insert(profile.id, document);
            inner.profiles.push(profile);
        }
        self
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_clears(&self, fail: bool) {
        self.fail_clears.store(fail, Ordering::SeqCst);
    }

    /// Blocks saves and clears until the returned guard is dropped.
    pub async fn hold(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// Resolves once a save or clear has started.
    pub async fn started(&self) {
        self.started.notified().await;
    }

    /// Every successfully written document, oldest first.
    pub fn writes(&self) -> Vec<ResumeDocument> {
        self.lock().writes.clone()
    }

    /// Returns the last written document for a profile.
    pub fn stored(&self, profile: Uuid) -> Option<ResumeDocument> {
        self.lock().documents.get(&profile).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn load(&self, profile: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("load disabled".to_string()));
        }
        Ok(self.lock().documents.get(&profile).cloned())
    }

    async fn save(
        &self,
        profile: &ProfileMeta,
        document: &ResumeDocument,
    ) -> Result<(), StoreError> {
        self.started.notify_one();
        let _gate = self.gate.read().await;
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save disabled".to_string()));
        }
        let mut inner = self.lock();
        inner.documents.insert(profile.id, document.clone());
        inner.writes.push(document.clone());
        let now = Utc::now();
        match inner.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => existing.updated_at = now,
            None => {
                let mut meta = profile.clone();
                meta.updated_at = now;
                inner.profiles.push(meta);
            }
        }
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.started.notify_one();
        let _gate = self.gate.read().await;
        if self.fail_clears.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("clear disabled".to_string()));
        }
        let mut inner = self.lock();
        inner.documents.clear();
        inner.profiles.clear();
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileMeta>, StoreError> {
        Ok(self.lock().profiles.clone())
    }
}
