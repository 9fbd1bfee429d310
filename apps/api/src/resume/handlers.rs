use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::profile::ProfileMeta;
use crate::models::resume::{ResumeDocument, SectionKey, SectionValue};
use crate::persistence::SaveStatus;
use crate::resume::{ResumeFacade, ResumeSnapshot};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResponse {
    #[serde(flatten)]
    pub snapshot: ResumeSnapshot,
    pub save_status: SaveStatus,
    pub profile: ProfileMeta,
}

fn respond(facade: &ResumeFacade) -> Json<ResumeResponse> {
    Json(ResumeResponse {
        snapshot: facade.snapshot(),
        save_status: facade.save_status(),
        profile: facade.profile().clone(),
    })
}

fn reject_invalid(document: &ResumeDocument) -> Result<(), AppError> {
    let errors = document.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<ResumeResponse>, AppError> {
    let facade = state.resume.use_resume()?;
    Ok(respond(&facade))
}

/// PUT /api/v1/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<ResumeResponse>, AppError> {
    let facade = state.resume.use_resume()?;
    reject_invalid(&document)?;
    facade.set_resume_data(document);
    Ok(respond(&facade))
}

/// PUT /api/v1/resume/sections/:section
pub async fn handle_put_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ResumeResponse>, AppError> {
    let facade = state.resume.use_resume()?;
    let key = SectionKey::parse(&section)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section '{section}'")))?;
    let value = SectionValue::from_json(key, body)
        .map_err(|e| AppError::Validation(format!("Invalid '{section}' section: {e}")))?;
    reject_invalid(&facade.resume_data().with_section(value.clone()))?;
    facade.update_section(value);
    Ok(respond(&facade))
}

/// POST /api/v1/resume/undo
pub async fn handle_undo(
    State(state): State<AppState>,
) -> Result<Json<ResumeResponse>, AppError> {
    let facade = state.resume.use_resume()?;
    facade.undo();
    Ok(respond(&facade))
}

/// POST /api/v1/resume/redo
pub async fn handle_redo(
    State(state): State<AppState>,
) -> Result<Json<ResumeResponse>, AppError> {
    let facade = state.resume.use_resume()?;
    facade.redo();
    Ok(respond(&facade))
}

/// DELETE /api/v1/resume/history
pub async fn handle_clear_history(
    State(state): State<AppState>,
) -> Result<Json<ResumeResponse>, AppError> {
    let facade = state.resume.use_resume()?;
    facade.clear_history();
    Ok(respond(&facade))
}

/// DELETE /api/v1/resume
pub async fn handle_clear_all(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let facade = state.resume.use_resume()?;
    facade.clear_all_data().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileMeta>>, AppError> {
    Ok(Json(state.store.list_profiles().await?))
}
