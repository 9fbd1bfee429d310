//! Debounced, coalescing save queue.
//!
//! `schedule` never blocks the caller. A single background task owns the
//! write path:
//! - requests inside the quiet window collapse to the latest document, and
//!   the window restarts on every request;
//! - writes run one at a time, so a request that arrives while a write is in
//!   flight is queued behind it rather than dropped;
//! - outcomes are published on a `watch` channel instead of being returned to
//!   the editor;
//! - clearing storage runs on the same task, so saves queued before a clear
//!   are dropped and saves queued after it land after it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::models::profile::ProfileMeta;
use crate::models::resume::ResumeDocument;
use crate::persistence::backend::{ResumeStore, StoreError};

/// Default quiet window before a pending save is written.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Last known state of the write path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SaveStatus {
    Idle,
    /// A document is waiting for the quiet window to elapse.
    Pending,
    Saving,
    Saved { at: DateTime<Utc> },
    Failed { message: String, at: DateTime<Utc> },
}

enum Command {
    Save(Box<ResumeDocument>),
    Flush(oneshot::Sender<()>),
    Clear(oneshot::Sender<Result<(), StoreError>>),
}

pub struct SaveScheduler {
    tx: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
}

impl SaveScheduler {
    /// Spawns the save worker for one profile. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn ResumeStore>, profile: ProfileMeta, quiet: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::Idle);
        tokio::spawn(run_worker(store, profile, quiet, rx, status_tx));
        Self { tx, status }
    }

    /// Queues a document for writing after the quiet window.
    pub fn schedule(&self, document: ResumeDocument) {
        if self.tx.send(Command::Save(Box::new(document))).is_err() {
            warn!("Save worker has stopped; dropping save request");
        }
    }

    /// Writes any pending document now and waits for the write to finish.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Queues a wipe of all stored data behind any write already in flight.
    ///
    /// The request is queued before this returns; the future resolves with the
    /// outcome. A pending write that has not started yet is dropped.
    pub fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send + 'static {
        let (ack_tx, ack_rx) = oneshot::channel();
        let queued = self.tx.send(Command::Clear(ack_tx)).is_ok();
        async move {
            if !queued {
                return Err(StoreError::Unavailable("save worker has stopped".to_string()));
            }
            ack_rx.await.unwrap_or_else(|_| {
                Err(StoreError::Unavailable("save worker stopped mid-clear".to_string()))
            })
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }
}

async fn run_worker(
    store: Arc<dyn ResumeStore>,
    profile: ProfileMeta,
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<SaveStatus>,
) {
    let mut pending: Option<Box<ResumeDocument>> = None;
    let mut coalesced = 0u32;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(quiet, rx.recv()).await {
                Ok(command) => command,
                Err(_elapsed) => {
                    if let Some(document) = pending.take() {
                        debug!(coalesced, "Quiet window elapsed; writing latest document");
                        write(&*store, &profile, &document, &status).await;
                    }
                    coalesced = 0;
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Save(document)) => {
                if pending.replace(document).is_some() {
                    coalesced += 1;
                }
                status.send_replace(SaveStatus::Pending);
            }
            Some(Command::Flush(ack)) => {
                if let Some(document) = pending.take() {
                    write(&*store, &profile, &document, &status).await;
                }
                coalesced = 0;
                let _ = ack.send(());
            }
            Some(Command::Clear(ack)) => {
                if pending.take().is_some() {
                    debug!(coalesced, "Dropped pending save ahead of clear");
                }
                coalesced = 0;
                let result = store.clear_all().await;
                match &result {
                    Ok(()) => status.send_replace(SaveStatus::Idle),
                    Err(e) => status.send_replace(SaveStatus::Failed {
                        message: e.to_string(),
                        at: Utc::now(),
                    }),
                };
                let _ = ack.send(result);
            }
            None => {
                if let Some(document) = pending.take() {
                    write(&*store, &profile, &document, &status).await;
                }
                debug!(profile = %profile.id, "Save worker stopped");
                break;
            }
        }
    }
}

async fn write(
    store: &dyn ResumeStore,
    profile: &ProfileMeta,
    document: &ResumeDocument,
    status: &watch::Sender<SaveStatus>,
) {
    status.send_replace(SaveStatus::Saving);
    match store.save(profile, document).await {
        Ok(()) => {
            status.send_replace(SaveStatus::Saved { at: Utc::now() });
        }
        Err(e) => {
            warn!(profile = %profile.id, "Saving resume failed: {e}");
            status.send_replace(SaveStatus::Failed {
                message: e.to_string(),
                at: Utc::now(),
            });
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
