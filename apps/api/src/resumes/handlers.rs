use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::jobs::store::{get_job, requirement_from_row};
use crate::models::{ResumeRow, ScoringRow};
use crate::parsing::resume_parser::{assess_extraction, ExtractionQuality};
use crate::resumes::store::{
    delete_original, file_hash, find_by_hash, get_resume, insert_resume, record_from_row,
    s3_key_for, upload_original, NewResume,
};
use crate::scoring::handlers::{score_pair, ScoreResponse};
use crate::scoring::history::{history_for_resume, latest_score, record_score};
use crate::scoring::models::ResumeRecord;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub resume: ResumeRow,
    pub record: ResumeRecord,
    pub quality: ExtractionQuality,
    /// True when the same file was already stored and that row is returned.
    pub duplicate: bool,
}

#[derive(Serialize)]
pub struct ResumeDetail {
    pub resume: ResumeRow,
    pub latest_score: Option<ScoringRow>,
}

#[derive(Deserialize)]
pub struct ScoreStoredRequest {
    pub job_id: Option<Uuid>,
    pub job_text: Option<String>,
    pub industry: Option<String>,
}

#[derive(Serialize)]
pub struct ScoreStoredResponse {
    pub history_id: Uuid,
    #[serde(flatten)]
    pub score: ScoreResponse,
}

struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// Reads the `file` field. Other fields are drained and ignored.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.txt").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
            file = Some(UploadedFile { filename, data });
        } else {
            let name = field.name().unwrap_or_default().to_string();
            field.bytes().await.map_err(|e| {
                AppError::Validation(format!("Failed to read form field '{name}': {e}"))
            })?;
        }
    }

    file.ok_or_else(|| AppError::Validation("Multipart field 'file' is required".to_string()))
}

/// The object stored under `id` has no row pointing at it unless the insert kept `id`.
fn upload_orphaned(stored: &anyhow::Result<ResumeRow>, id: Uuid) -> bool {
    !matches!(stored, Ok(row) if row.id == id)
}

async fn load_resume(state: &AppState, id: Uuid) -> Result<ResumeRow, AppError> {
    get_resume(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// POST /api/v1/resumes/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let UploadedFile { filename, data } = read_upload(multipart).await?;

    let limits = state.config.extraction_limits();
    let (document, data) = {
        let filename = filename.clone();
        tokio::task::spawn_blocking(move || {
            extract_text(&filename, &data, &limits).map(|doc| (doc, data))
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))??
    };

    let hash = file_hash(&data);
    if let Some(existing) = find_by_hash(&state.db, &hash).await? {
        info!("Duplicate upload of {filename}; returning resume {}", existing.id);
        let record = record_from_row(&existing)?;
        let quality = assess_extraction(&record);
        return Ok(Json(UploadResponse {
            resume: existing,
            record,
            quality,
            duplicate: true,
        }));
    }

    let id = Uuid::new_v4();
    let s3_key = s3_key_for(id, &filename);
    upload_original(
        &state.s3,
        &state.config.s3_bucket,
        &s3_key,
        data,
        document.kind.content_type(),
    )
    .await
    .map_err(|e| AppError::S3(e.to_string()))?;

    let record = state.resume_parser.parse(&document.text);
    let quality = assess_extraction(&record);
    let stored = insert_resume(
        &state.db,
        NewResume {
            id,
            filename: &filename,
            file_hash: &hash,
            s3_key: &s3_key,
            raw_text: &document.text,
            parsed: &record,
        },
    )
    .await;

    if upload_orphaned(&stored, id) {
        if let Err(e) = delete_original(&state.s3, &state.config.s3_bucket, &s3_key).await {
            warn!("Failed to remove orphaned upload {s3_key}: {e:#}");
        }
    }
    let resume = stored?;

    let duplicate = resume.id != id;
    Ok(Json(UploadResponse {
        resume,
        record,
        quality,
        duplicate,
    }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeDetail>, AppError> {
    let resume = load_resume(&state, id).await?;
    let latest_score = latest_score(&state.db, id).await?;
    Ok(Json(ResumeDetail {
        resume,
        latest_score,
    }))
}

/// GET /api/v1/resumes/:id/scores
pub async fn handle_resume_scores(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ScoringRow>>, AppError> {
    load_resume(&state, id).await?;
    Ok(Json(history_for_resume(&state.db, id).await?))
}

/// POST /api/v1/resumes/:id/score
pub async fn handle_score_stored(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScoreStoredRequest>,
) -> Result<Json<ScoreStoredResponse>, AppError> {
    let job_text = req.job_text.filter(|t| !t.trim().is_empty());
    let job = match (req.job_id, job_text) {
        (Some(job_id), _) => {
            let row = get_job(&state.db, job_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Job template {job_id} not found")))?;
            requirement_from_row(&row)?
        }
        (None, Some(text)) => state.jd_extractor.extract(&text),
        (None, None) => {
            return Err(AppError::Validation(
                "Either job_id or job_text is required".to_string(),
            ))
        }
    };

    let resume_row = load_resume(&state, id).await?;
    let resume = record_from_row(&resume_row)?;

    let score = score_pair(&state, resume, job, req.industry).await?;
    let history = record_score(&state.db, id, req.job_id, &score.report).await?;

    Ok(Json(ScoreStoredResponse {
        history_id: history.id,
        score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(id: Uuid) -> ResumeRow {
        ResumeRow {
            id,
            filename: "cv.txt".into(),
            file_hash: file_hash(b"cv"),
            s3_key: s3_key_for(id, "cv.txt"),
            raw_text: "Jane".into(),
            parsed: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_upload_kept_when_row_stored_under_new_id() {
        let id = Uuid::new_v4();
        assert!(!upload_orphaned(&Ok(row(id)), id));
    }

    #[test]
    fn test_upload_orphaned_when_concurrent_duplicate_wins() {
        let id = Uuid::new_v4();
        assert!(upload_orphaned(&Ok(row(Uuid::new_v4())), id));
    }

    #[test]
    fn test_upload_orphaned_when_insert_fails() {
        let id = Uuid::new_v4();
        assert!(upload_orphaned(&Err(anyhow::anyhow!("insert failed")), id));
    }
}
