use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::records::models::{
    Application, CandidateProfile, EducationEntry, ExperienceEntry, JobPosting,
};
use crate::records::search::filter_jobs;
use crate::records::{ApplicationForm, EducationDraft, ExperienceDraft};
use crate::session::Identity;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub viewer: Identity,
    pub count: usize,
    pub jobs: Vec<JobPosting>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: CandidateProfile,
    pub applications: Vec<Application>,
}

/// GET /dashboard/candidate?q=&location=
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(viewer): Extension<Identity>,
    Query(search): Query<SearchQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let all = state.jobs.load_all().await?;
    let jobs: Vec<JobPosting> = filter_jobs(&all, &search.q, &search.location)
        .into_iter()
        .cloned()
        .collect();
    debug!(
        "Job search q='{}' location='{}': {} of {}",
        search.q,
        search.location,
        jobs.len(),
        all.len()
    );
    Ok(Json(JobListResponse {
        viewer,
        count: jobs.len(),
        jobs,
    }))
}

/// GET /dashboard/candidate/job/:id
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

/// POST /dashboard/candidate/job/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(form): Json<ApplicationForm>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let job = state
        .jobs
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    let application = state.applications.submit(&job, form).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /dashboard/candidate/profile
pub async fn handle_profile(
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(ProfileResponse {
        profile: state.profile.load().await?,
        applications: state.applications.list().await?,
    }))
}

/// PUT /dashboard/candidate/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(profile): Json<CandidateProfile>,
) -> Result<Json<CandidateProfile>, AppError> {
    Ok(Json(state.profile.save(profile).await?))
}

/// POST /dashboard/candidate/profile/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(draft): Json<ExperienceDraft>,
) -> Result<(StatusCode, Json<ExperienceEntry>), AppError> {
    let entry = state.profile.add_experience(draft).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /dashboard/candidate/profile/experience/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.profile.remove_experience(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /dashboard/candidate/profile/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(draft): Json<EducationDraft>,
) -> Result<(StatusCode, Json<EducationEntry>), AppError> {
    let entry = state.profile.add_education(draft).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /dashboard/candidate/profile/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.profile.remove_education(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /dashboard/candidate/applications
pub async fn handle_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(state.applications.list().await?))
}

/// DELETE /dashboard/candidate/applications/:id
pub async fn handle_withdraw(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.applications.withdraw(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::testing;
    use crate::session::Role;
    use crate::storage::keys;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_filters_by_query_and_location() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Candidate).await;

        let (status, body) = testing::get(&app, "/dashboard/candidate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(body["viewer"]["role"], "candidate");

        let uri = "/dashboard/candidate?q=react&location=san%20francisco";
        let (_, body) = testing::get(&app, uri).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["jobs"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_apply_with_empty_name_is_rejected() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Candidate).await;

        let (status, body) = testing::send_json(
            &app,
            "POST",
            "/dashboard/candidate/job/2/apply",
            json!({ "fullName": "", "email": "jane@example.com", "resumeFileName": "cv.pdf" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please fill all required fields and upload your resume"
        );
        assert!(storage
            .backend()
            .get(keys::CANDIDATE_APPLICATIONS)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_apply_then_list_then_withdraw() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Candidate).await;

        let (status, created) = testing::send_json(
            &app,
            "POST",
            "/dashboard/candidate/job/2/apply",
            json!({
                "fullName": "Jane Smith",
                "email": "jane@example.com",
                "resumeFileName": "cv.pdf",
                "linkedIn": "linkedin.com/in/jane"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["jobTitle"], "Backend Engineer");

        let (_, listed) = testing::get(&app, "/dashboard/candidate/applications").await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let id = created["id"].as_str().unwrap();
        let uri = format!("/dashboard/candidate/applications/{id}");
        let status = testing::delete(&app, &uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, profile) = testing::get(&app, "/dashboard/candidate/profile").await;
        assert!(profile["applications"].as_array().unwrap().is_empty());
        assert_eq!(profile["profile"]["fullName"], "Jane Smith");
    }

    #[tokio::test]
    async fn test_apply_to_unknown_job_is_not_found() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Candidate).await;
        let (status, _) = testing::send_json(
            &app,
            "POST",
            "/dashboard/candidate/job/404/apply",
            json!({ "fullName": "Jane", "email": "j@e.com", "resumeFileName": "cv.pdf" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_save_and_experience_routes() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Candidate).await;

        let (_, body) = testing::get(&app, "/dashboard/candidate/profile").await;
        let mut profile = body["profile"].clone();
        profile["about"] = json!("Rustacean");

        let (status, saved) =
            testing::send_json(&app, "PUT", "/dashboard/candidate/profile", profile).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["about"], "Rustacean");

        let (status, entry) = testing::send_json(
            &app,
            "POST",
            "/dashboard/candidate/profile/experience",
            json!({ "role": "Engineer", "company": "Ferrous" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let id = entry["id"].as_u64().unwrap();
        let path = format!("/dashboard/candidate/profile/experience/{id}");
        assert_eq!(testing::delete(&app, &path).await, StatusCode::NO_CONTENT);
        assert_eq!(testing::delete(&app, &path).await, StatusCode::NOT_FOUND);

        let (_, body) = testing::get(&app, "/dashboard/candidate/profile").await;
        assert_eq!(body["profile"]["about"], "Rustacean");
    }
}
