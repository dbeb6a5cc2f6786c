use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::parsing::resume_parser::{assess_extraction, ExtractionQuality};
use crate::scoring::models::{JobRequirement, ResumeRecord};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ParsedResumeResponse {
    pub record: ResumeRecord,
    pub quality: ExtractionQuality,
}

fn non_empty(text: &str, what: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("{what} text must not be empty")));
    }
    Ok(())
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParsedResumeResponse>, AppError> {
    non_empty(&req.text, "Résumé")?;
    let record = state.resume_parser.parse(&req.text);
    let quality = assess_extraction(&record);
    Ok(Json(ParsedResumeResponse { record, quality }))
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<JobRequirement>, AppError> {
    non_empty(&req.text, "Job description")?;
    Ok(Json(state.jd_extractor.extract(&req.text)))
}
