use std::sync::Arc;

use crate::layout::{ContentMeasurer, ReportedRegion};
use crate::persistence::ResumeStore;
use crate::resume::ResumeContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Slot holding the mounted resume facade.
    pub resume: ResumeContext,
    pub store: Arc<dyn ResumeStore>,
    pub measurer: Arc<ContentMeasurer>,
    /// Preview region whose height the UI reports.
    pub region: Arc<ReportedRegion>,
}
