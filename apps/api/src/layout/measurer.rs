//! Content Measurer — derives the page count from the rendered height of a
//! content region.
//!
//! # Notification contract
//! A region announces layout changes as `LayoutEvent`s on an unbounded
//! channel. `ContentMeasurer::observe` drains every event that is ready and
//! measures once per batch, so a burst of reflows costs one measurement.
//! Observation ends when the channel closes or the region is detached.
//!
//! The page count may briefly lag the document: it follows layout, not edits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::layout::page_metrics::pages_for_height;

/// What changed in the observed region. All kinds trigger the same measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutEvent {
    /// The viewport was resized.
    Resize,
    /// The region's own box changed size.
    BoxResize,
    /// Text or child nodes inside the region changed.
    Mutation,
}

/// A rendered subtree whose full (scroll) height can be read. Read-only.
pub trait ContentRegion: Send + Sync {
    fn scroll_height(&self) -> f64;
}

// ────────────────────────────────────────────────────────────────────────────
// Reported region
// ────────────────────────────────────────────────────────────────────────────

/// A region whose height is pushed in by the client that renders it.
pub struct ReportedRegion {
    height_bits: AtomicU64,
    events: mpsc::UnboundedSender<LayoutEvent>,
}

impl ReportedRegion {
    /// Creates a region of height 0 and the receiving end of its notifications.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<LayoutEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let region = Arc::new(Self {
            height_bits: AtomicU64::new(0f64.to_bits()),
            events,
        });
        (region, rx)
    }

    /// Records a new rendered height, notifying observers if it changed.
    pub fn report(&self, height: f64) {
        let previous = f64::from_bits(self.height_bits.swap(height.to_bits(), Ordering::SeqCst));
        if previous != height {
            self.notify(LayoutEvent::BoxResize);
        }
    }

    pub fn notify(&self, event: LayoutEvent) {
        // Nobody observing is fine; the next attach measures anyway.
        let _ = self.events.send(event);
    }
}

impl ContentRegion for ReportedRegion {
    fn scroll_height(&self) -> f64 {
        f64::from_bits(self.height_bits.load(Ordering::SeqCst))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurer
// ────────────────────────────────────────────────────────────────────────────

pub struct ContentMeasurer {
    region: RwLock<Option<Arc<dyn ContentRegion>>>,
    total_pages: watch::Sender<u32>,
    observer: Mutex<Option<JoinHandle<()>>>,
}

impl Default for ContentMeasurer {
    fn default() -> Self {
        Self {
            region: RwLock::new(None),
            total_pages: watch::Sender::new(1),
            observer: Mutex::new(None),
        }
    }
}

impl ContentMeasurer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attaches a region and measures it right away.
    pub fn attach(&self, region: Arc<dyn ContentRegion>) -> u32 {
        *self.region.write().unwrap_or_else(|e| e.into_inner()) = Some(region);
        self.measure()
    }

    /// Stops observing and forgets the region. The last page count is kept.
    pub fn detach(&self) {
        if let Some(handle) = self.observer.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
        *self.region.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Re-measures on every batch of layout notifications. Replaces any previous observer.
    pub fn observe(self: &Arc<Self>, mut events: mpsc::UnboundedReceiver<LayoutEvent>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            while let Some(first) = events.recv().await {
                let mut batch = 1u32;
                while events.try_recv().is_ok() {
                    batch += 1;
                }
                let Some(measurer) = weak.upgrade() else {
                    break;
                };
                trace!(?first, batch, "Layout notifications received");
                measurer.measure();
            }
        });

        let mut slot = self.observer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Reads the region's height and publishes the resulting page count.
    ///
    /// Without an attached region this is a no-op returning the last count.
    pub fn measure(&self) -> u32 {
        let height = {
            let region = self.region.read().unwrap_or_else(|e| e.into_inner());
            match region.as_ref() {
                Some(region) => region.scroll_height(),
                None => return self.total_pages(),
            }
        };

        let pages = pages_for_height(height);
        self.total_pages.send_if_modified(|current| {
            if *current == pages {
                return false;
            }
            debug!(height, from = *current, to = pages, "Page count changed");
            *current = pages;
            true
        });
        pages
    }

    pub fn total_pages(&self) -> u32 {
        *self.total_pages.borrow()
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.region
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.total_pages.subscribe()
    }
}

impl Drop for ContentMeasurer {
    fn drop(&mut self) {
        if let Some(handle) = self.observer.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
