use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::measurer::LayoutEvent;
use crate::layout::page_metrics::{PageMetrics, A4, MAX_CONTENT_HEIGHT};
use crate::layout::{PaginationOverlay, RenderMode};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ModeQuery {
    #[serde(default)]
    pub mode: RenderMode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureRequest {
    /// Rendered (scroll) height of the preview content, in CSS pixels.
    pub height: f64,
    /// What triggered the report. A viewport resize or a content mutation
    /// re-measures even when the height is unchanged.
    #[serde(default)]
    pub event: Option<LayoutEvent>,
    #[serde(default)]
    pub mode: RenderMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub total_pages: u32,
    pub metrics: PageMetrics,
    pub overlay: PaginationOverlay,
}

fn respond(total_pages: u32, mode: RenderMode) -> Json<PaginationResponse> {
    Json(PaginationResponse {
        total_pages,
        metrics: A4,
        overlay: PaginationOverlay::derive(total_pages, mode),
    })
}

/// POST /api/v1/layout/measure
pub async fn handle_measure(
    State(state): State<AppState>,
    Json(req): Json<MeasureRequest>,
) -> Result<Json<PaginationResponse>, AppError> {
    if !req.height.is_finite() || req.height < 0.0 {
        return Err(AppError::Validation(format!(
            "height must be a non-negative number, got {}",
            req.height
        )));
    }
    if req.height > MAX_CONTENT_HEIGHT as f64 {
        return Err(AppError::Validation(format!(
            "height must be at most {MAX_CONTENT_HEIGHT}px, got {}",
            req.height
        )));
    }
    state.region.report(req.height);
    if let Some(event) = req.event {
        state.region.notify(event);
    }
    let total_pages = state.measurer.measure();
    Ok(respond(total_pages, req.mode))
}

/// GET /api/v1/layout
pub async fn handle_get_layout(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
) -> Json<PaginationResponse> {
    respond(state.measurer.total_pages(), query.mode)
}
