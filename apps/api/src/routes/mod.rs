pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::layout::handlers as layout;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume editing
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume)
                .put(resume::handle_put_resume)
                .delete(resume::handle_clear_all),
        )
        .route(
            "/api/v1/resume/sections/:section",
            put(resume::handle_put_section),
        )
        .route("/api/v1/resume/undo", post(resume::handle_undo))
        .route("/api/v1/resume/redo", post(resume::handle_redo))
        .route(
            "/api/v1/resume/history",
            delete(resume::handle_clear_history),
        )
        .route("/api/v1/profiles", get(resume::handle_list_profiles))
        // Pagination
        .route("/api/v1/layout", get(layout::handle_get_layout))
        .route("/api/v1/layout/measure", post(layout::handle_measure))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
