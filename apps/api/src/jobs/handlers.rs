use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::{get_job, insert_job, list_jobs, NewJobTemplate, DEFAULT_LIST_LIMIT};
use crate::models::JobTemplateRow;
use crate::scoring::models::JobRequirement;
use crate::state::AppState;

const UNTITLED: &str = "Untitled role";

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: String,
}

#[derive(Serialize)]
pub struct CreateJobResponse {
    pub job: JobTemplateRow,
    pub requirements: JobRequirement,
}

#[derive(Deserialize)]
pub struct JobListQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, AppError> {
    if req.description.trim().is_empty() {
        return Err(AppError::Validation("description must not be empty".to_string()));
    }

    let requirements = state.jd_extractor.extract(&req.description);
    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or(requirements.title.as_deref())
        .unwrap_or(UNTITLED)
        .to_string();

    let job = insert_job(
        &state.db,
        NewJobTemplate {
            title: &title,
            company: req.company.as_deref().map(str::trim).filter(|c| !c.is_empty()),
            description: &req.description,
            requirements: &requirements,
        },
    )
    .await?;

    Ok(Json(CreateJobResponse { job, requirements }))
}

/// GET /api/v1/jobs?q=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<JobTemplateRow>>, AppError> {
    let jobs = list_jobs(
        &state.db,
        params.q.as_deref(),
        params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
    )
    .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobTemplateRow>, AppError> {
    get_job(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job template {id} not found")))
}
