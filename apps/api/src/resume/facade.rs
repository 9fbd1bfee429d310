//! Resume data facade — the single editing surface for the current resume.
//!
//! # Lifecycle
//! A `ResumeContext` is an empty slot until `provide` loads a document and
//! mounts a `ResumeFacade` into it. `use_resume` on an empty slot fails with
//! `ResumeError::OutsideProvider`; that is a wiring bug in the caller, so it
//! is returned immediately rather than papered over with a default.
//!
//! # Writes
//! Every committed change (set, section update, effective undo/redo) is
//! queued on the `SaveScheduler` while the history lock is held, so saves are
//! queued in edit order. Edits never wait for, or fail because of, storage.
//!
//! `clear_all_data` resets memory and queues the storage wipe under that same
//! lock. Edits made while the wipe runs apply to the reset document and are
//! saved after the wipe, so memory and storage never disagree.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::profile::{select_profile, ProfileMeta};
use crate::models::resume::{ResumeDocument, SectionValue};
use crate::persistence::scheduler::DEFAULT_QUIET_WINDOW;
use crate::persistence::{ResumeStore, SaveScheduler, SaveStatus, StoreError};
use crate::resume::history::{HistoryStore, DEFAULT_MAX_DEPTH};

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("resume data used outside of its provider")]
    OutsideProvider,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Profile to open. Falls back to the most recently updated one.
    pub profile: Option<Uuid>,
    pub max_depth: usize,
    pub quiet_window: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            profile: None,
            max_depth: DEFAULT_MAX_DEPTH,
            quiet_window: DEFAULT_QUIET_WINDOW,
        }
    }
}

/// Document plus history flags, read under one lock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSnapshot {
    pub resume_data: ResumeDocument,
    pub can_undo: bool,
    pub can_redo: bool,
}

struct Inner {
    history: Mutex<HistoryStore<ResumeDocument>>,
    saver: SaveScheduler,
    profile: ProfileMeta,
}

#[derive(Clone)]
pub struct ResumeFacade {
    inner: Arc<Inner>,
}

impl ResumeFacade {
    fn history(&self) -> MutexGuard<'_, HistoryStore<ResumeDocument>> {
        // Every mutation leaves the store consistent, so a poisoned lock is still usable.
        self.inner
            .history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn resume_data(&self) -> ResumeDocument {
        self.history().get().clone()
    }

    pub fn snapshot(&self) -> ResumeSnapshot {
        let history = self.history();
        ResumeSnapshot {
            resume_data: history.get().clone(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
        }
    }

    /// Replaces the whole document.
    pub fn set_resume_data(&self, document: ResumeDocument) {
        let mut history = self.history();
        history.set(document);
        self.inner.saver.schedule(history.get().clone());
    }

    /// Replaces one top-level section.
    pub fn update_section(&self, value: SectionValue) {
        let mut history = self.history();
        history.update(|doc| doc.with_section(value));
        self.inner.saver.schedule(history.get().clone());
    }

    /// Steps back one edit. Returns false (and does nothing) when there is no history.
    pub fn undo(&self) -> bool {
        let mut history = self.history();
        let moved = history.undo();
        if moved {
            self.inner.saver.schedule(history.get().clone());
        }
        moved
    }

    /// Re-applies one undone edit. Returns false (and does nothing) when there is nothing to redo.
    pub fn redo(&self) -> bool {
        let mut history = self.history();
        let moved = history.redo();
        if moved {
            self.inner.saver.schedule(history.get().clone());
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history().can_redo()
    }

    /// Forgets undo/redo history. The document is unchanged and nothing is saved.
    pub fn clear_history(&self) {
        self.history().clear_history();
    }

    /// Resets the document and history and wipes persisted storage.
    ///
    /// If the wipe fails and nothing was edited in the meantime, the previous
    /// document and history are restored and re-queued for saving.
    pub async fn clear_all_data(&self) -> Result<(), ResumeError> {
        let (previous, revision, cleared) = {
            let mut history = self.history();
            let previous = history.clone();
            history.reset(ResumeDocument::default());
            let revision = history.revision();
            (previous, revision, self.inner.saver.clear())
        };

        if let Err(e) = cleared.await {
            warn!("Clearing stored resume data failed: {e}");
            let mut history = self.history();
            if history.revision() == revision {
                history.restore(previous);
                self.inner.saver.schedule(history.get().clone());
            }
            return Err(e.into());
        }
        info!(profile = %self.inner.profile.id, "Cleared all resume data");
        Ok(())
    }

    pub fn save_status(&self) -> SaveStatus {
        self.inner.saver.status()
    }

    pub fn profile(&self) -> &ProfileMeta {
        &self.inner.profile
    }

    /// Writes any pending save now.
    pub async fn flush(&self) {
        self.inner.saver.flush().await;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provider
// ────────────────────────────────────────────────────────────────────────────

/// Shared slot through which consumers reach the mounted facade.
#[derive(Clone, Default)]
pub struct ResumeContext {
    slot: Arc<RwLock<Option<ResumeFacade>>>,
}

impl ResumeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the selected profile and mounts a facade for it.
    ///
    /// Storage failures during load are logged and fall back to an empty document.
    pub async fn provide(
        &self,
        store: Arc<dyn ResumeStore>,
        options: ProviderOptions,
    ) -> ResumeFacade {
        self.unmount().await;

        let profiles = store.list_profiles().await.unwrap_or_else(|e| {
            warn!("Reading profile index failed, starting without profiles: {e}");
            Vec::new()
        });
        let profile = select_profile(&profiles, options.profile).unwrap_or_else(|| {
            let mut profile = ProfileMeta::new("Default");
            if let Some(id) = options.profile {
                profile.id = id;
            }
            profile
        });

        let document = match store.load(profile.id).await {
            Ok(Some(document)) => {
                info!(profile = %profile.id, "Loaded saved resume");
                document
            }
            Ok(None) => {
                info!(profile = %profile.id, "No saved resume, starting empty");
                ResumeDocument::default()
            }
            Err(e) => {
                warn!(profile = %profile.id, "Loading resume failed, starting empty: {e}");
                ResumeDocument::default()
            }
        };

        let history = HistoryStore::new(document, options.max_depth);
        info!(
            profile = %profile.id,
            max_depth = history.max_depth(),
            "Resume provider mounted"
        );
        let facade = ResumeFacade {
            inner: Arc::new(Inner {
                history: Mutex::new(history),
                saver: SaveScheduler::spawn(store, profile.clone(), options.quiet_window),
                profile,
            }),
        };
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(facade.clone());
        facade
    }

    /// Returns the mounted facade, or `OutsideProvider` if none is mounted.
    pub fn use_resume(&self) -> Result<ResumeFacade, ResumeError> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ResumeError::OutsideProvider)
    }

    /// Flushes pending saves and empties the slot.
    pub async fn unmount(&self) {
        let facade = self.slot.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(facade) = facade {
            facade.flush().await;
            info!(profile = %facade.profile().id, "Resume provider unmounted");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, SkillEntry};
    use crate::persistence::MemoryStore;

    fn options(max_depth: usize) -> ProviderOptions {
        ProviderOptions {
            max_depth,
            quiet_window: Duration::from_millis(200),
            ..Default::default()
        }
    }

    async fn mount(store: Arc<MemoryStore>, max_depth: usize) -> (ResumeContext, ResumeFacade) {
        let context = ResumeContext::new();
        let facade = context.provide(store, options(max_depth)).await;
        (context, facade)
    }

    fn skills(names: &[&str]) -> SectionValue {
        SectionValue::Skills(
            names
                .iter()
                .map(|n| SkillEntry {
                    name: n.to_string(),
                    ..SkillEntry::new()
                })
                .collect(),
        )
    }

    fn named(name: &str) -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.personal_info.full_name = name.to_string();
        doc
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    #[test]
    fn test_use_outside_provider_is_lifecycle_error() {
        let context = ResumeContext::new();
        let err = context.use_resume().err().expect("must fail outside provider");
        assert!(matches!(err, ResumeError::OutsideProvider));
    }

    #[tokio::test]
    async fn test_use_after_unmount_is_lifecycle_error() {
        let (context, _facade) = mount(Arc::new(MemoryStore::new()), 10).await;
        assert!(context.use_resume().is_ok());
        context.unmount().await;
        assert!(matches!(
            context.use_resume(),
            Err(ResumeError::OutsideProvider)
        ));
    }

    #[tokio::test]
    async fn test_provide_loads_saved_document() {
        let profile = ProfileMeta::new("Saved");
        let store = Arc::new(MemoryStore::new().with_document(profile.clone(), named("Ada")));
        let (_context, facade) = mount(store, 10).await;
        assert_eq!(facade.resume_data(), named("Ada"));
        assert_eq!(facade.profile().id, profile.id);
        assert!(!facade.can_undo());
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_default() {
        let store = Arc::new(MemoryStore::new().with_document(ProfileMeta::new("x"), named("Ada")));
        store.set_fail_loads(true);
        let (_context, facade) = mount(store, 10).await;
        assert_eq!(facade.resume_data(), ResumeDocument::default());
    }

    #[tokio::test]
    async fn test_requested_unknown_profile_id_is_used_for_new_profile() {
        let id = Uuid::new_v4();
        let context = ResumeContext::new();
        let facade = context
            .provide(
                Arc::new(MemoryStore::new()),
                ProviderOptions {
                    profile: Some(id),
                    ..options(10)
                },
            )
            .await;
        assert_eq!(facade.profile().id, id);
    }

    // ── history through the facade ──────────────────────────────────────────

    #[tokio::test]
    async fn test_n_edits_then_n_undos_restore_original() {
        let (_context, facade) = mount(Arc::new(MemoryStore::new()), 50).await;
        let original = facade.resume_data();
        let names = ["a", "b", "c", "d", "e"];
        for (i, _) in names.iter().enumerate() {
            facade.update_section(skills(&names[..=i]));
        }
        for _ in names {
            assert!(facade.undo());
        }
        assert_eq!(facade.resume_data(), original);
        assert!(!facade.can_undo());
    }

    #[tokio::test]
    async fn test_undos_then_redos_return_to_latest() {
        let (_context, facade) = mount(Arc::new(MemoryStore::new()), 50).await;
        for name in ["a", "b", "c", "d"] {
            facade.set_resume_data(named(name));
        }
        let latest = facade.resume_data();
        for _ in 0..3 {
            facade.undo();
        }
        assert_eq!(facade.resume_data(), named("a"));
        for _ in 0..3 {
            assert!(facade.redo());
        }
        assert_eq!(facade.resume_data(), latest);
    }

    #[tokio::test]
    async fn test_edit_after_undo_clears_redo() {
        let (_context, facade) = mount(Arc::new(MemoryStore::new()), 50).await;
        facade.set_resume_data(named("a"));
        facade.set_resume_data(named("b"));
        facade.undo();
        assert!(facade.can_redo());

        facade.update_section(SectionValue::Experience(vec![ExperienceEntry::new()]));
        assert!(!facade.can_redo());
        assert!(!facade.redo());
        assert_eq!(facade.resume_data().experience.len(), 1);
    }

    #[tokio::test]
    async fn test_depth_bound_evicts_earliest_edit() {
        let max_depth = 3;
        let (_context, facade) = mount(Arc::new(MemoryStore::new()), max_depth).await;
        for name in ["a", "b", "c", "d"] {
            facade.set_resume_data(named(name));
        }
        while facade.undo() {}
        assert_eq!(
            facade.resume_data(),
            named("a"),
            "state before the first edit is no longer reachable"
        );
    }

    #[tokio::test]
    async fn test_clear_history_keeps_document() {
        let (_context, facade) = mount(Arc::new(MemoryStore::new()), 50).await;
        facade.set_resume_data(named("a"));
        facade.set_resume_data(named("b"));
        facade.undo();
        facade.clear_history();
        assert_eq!(facade.resume_data(), named("a"));
        assert!(!facade.can_undo());
        assert!(!facade.can_redo());
    }

    #[tokio::test]
    async fn test_undo_redo_without_history_are_noops() {
        let (_context, facade) = mount(Arc::new(MemoryStore::new()), 50).await;
        assert!(!facade.undo());
        assert!(!facade.redo());
        assert_eq!(facade.resume_data(), ResumeDocument::default());
    }

    // ── persistence coordination ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_saves_latest_once() {
        let store = Arc::new(MemoryStore::new());
        let (_context, facade) = mount(store.clone(), 50).await;
        for name in ["a", "b", "c"] {
            facade.set_resume_data(named(name));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.stored(facade.profile().id), Some(named("c")));
    }

    #[tokio::test]
    async fn test_undo_saves_restored_document() {
        let store = Arc::new(MemoryStore::new());
        let (_context, facade) = mount(store.clone(), 50).await;
        facade.set_resume_data(named("a"));
        facade.set_resume_data(named("b"));
        facade.undo();
        facade.flush().await;
        assert_eq!(store.stored(facade.profile().id), Some(named("a")));

        facade.redo();
        facade.flush().await;
        assert_eq!(store.stored(facade.profile().id), Some(named("b")));
    }

    #[tokio::test]
    async fn test_clear_history_and_noop_undo_do_not_save() {
        let store = Arc::new(MemoryStore::new());
        let (_context, facade) = mount(store.clone(), 50).await;
        facade.clear_history();
        facade.undo();
        facade.flush().await;
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_failure_does_not_block_edits() {
        let store = Arc::new(MemoryStore::new());
        let (_context, facade) = mount(store.clone(), 50).await;
        store.set_fail_saves(true);
        facade.set_resume_data(named("a"));
        facade.flush().await;
        assert!(matches!(facade.save_status(), SaveStatus::Failed { .. }));

        facade.set_resume_data(named("b"));
        assert_eq!(facade.resume_data(), named("b"));
        assert!(facade.can_undo());
    }

    #[tokio::test]
    async fn test_clear_all_data_resets_document_history_and_storage() {
        let profile = ProfileMeta::new("Saved");
        let store = Arc::new(MemoryStore::new().with_document(profile.clone(), named("Ada")));
        let (_context, facade) = mount(store.clone(), 50).await;
        facade.set_resume_data(named("Grace"));

        facade.clear_all_data().await.unwrap();
        assert_eq!(facade.resume_data(), ResumeDocument::default());
        assert!(!facade.can_undo());
        assert!(!facade.can_redo());

        // The dropped pending save must not resurrect the old document.
        facade.flush().await;
        assert_eq!(store.stored(profile.id), None);
        assert!(store.list_profiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_during_clear_is_kept_in_memory_and_storage() {
        let profile = ProfileMeta::new("Saved");
        let store = Arc::new(MemoryStore::new().with_document(profile.clone(), named("Ada")));
        let (_context, facade) = mount(store.clone(), 50).await;

        let gate = store.hold().await;
        let clearing = tokio::spawn({
            let facade = facade.clone();
            async move { facade.clear_all_data().await }
        });
        store.started().await;

        facade.set_resume_data(named("edit during clear"));
        drop(gate);
        clearing.await.unwrap().unwrap();
        facade.flush().await;

        assert_eq!(facade.resume_data(), named("edit during clear"));
        assert_eq!(store.stored(profile.id), Some(facade.resume_data()));
        assert!(facade.can_undo());
        assert!(facade.undo());
        assert_eq!(facade.resume_data(), ResumeDocument::default());
    }

    #[tokio::test]
    async fn test_failed_clear_restores_document_and_history() {
        let store = Arc::new(MemoryStore::new());
        let (_context, facade) = mount(store.clone(), 50).await;
        facade.set_resume_data(named("a"));
        facade.set_resume_data(named("b"));
        store.set_fail_clears(true);

        let err = facade.clear_all_data().await.unwrap_err();
        assert!(matches!(err, ResumeError::Store(_)));
        assert_eq!(facade.resume_data(), named("b"));
        assert!(facade.undo());
        assert_eq!(facade.resume_data(), named("a"));

        facade.flush().await;
        assert_eq!(store.stored(facade.profile().id), Some(named("a")));
    }

    #[tokio::test]
    async fn test_unmount_flushes_pending_save() {
        let store = Arc::new(MemoryStore::new());
        let (context, facade) = mount(store.clone(), 50).await;
        facade.set_resume_data(named("unsaved"));
        let id = facade.profile().id;
        context.unmount().await;
        assert_eq!(store.stored(id), Some(named("unsaved")));
    }
}
