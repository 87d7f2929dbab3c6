use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::records::jobs::JobEdit;
use crate::records::models::JobPosting;
use crate::records::JobDraft;
use crate::session::Identity;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RecruiterDashboard {
    pub viewer: Identity,
    pub count: usize,
    pub jobs: Vec<JobPosting>,
}

/// GET /dashboard/recruiter
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(viewer): Extension<Identity>,
) -> Result<Json<RecruiterDashboard>, AppError> {
    let jobs = state.jobs.load_all().await?;
    Ok(Json(RecruiterDashboard {
        viewer,
        count: jobs.len(),
        jobs,
    }))
}

/// POST /dashboard/recruiter/create-job
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let job = state.jobs.create(draft).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /dashboard/recruiter/job/:id
pub async fn handle_job(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<JobPosting>, AppError> {
    let job = state
        .jobs
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PUT /dashboard/recruiter/job/:id
/// Persists only when the service runs with `PERSIST_JOB_EDITS=true`.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<JobEdit>, AppError> {
    Ok(Json(state.jobs.update(id, draft).await?))
}

/// DELETE /dashboard/recruiter/job/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.jobs.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
