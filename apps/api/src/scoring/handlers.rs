use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::info;

use crate::errors::AppError;
use crate::recommendations::{generate, Recommendations};
use crate::scoring::history::{scoring_stats, ScoringStats};
use crate::scoring::models::{JobRequirement, ResumeRecord};
use crate::scoring::report::{build_report, ScoreReport};
use crate::scoring::scorer::require_inputs;
use crate::scoring::service::score_with_cache;
use crate::state::AppState;

pub const MAX_BATCH_SIZE: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub resume: Option<ResumeRecord>,
    pub job: Option<JobRequirement>,
    /// Benchmark industry. Defaults to the job's industry, then `general`.
    pub industry: Option<String>,
}

#[derive(Deserialize)]
pub struct ScoreTextRequest {
    pub resume_text: String,
    pub job_text: String,
    pub industry: Option<String>,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub report: ScoreReport,
    pub recommendations: Recommendations,
    pub cached: bool,
}

#[derive(Deserialize)]
pub struct BatchScoreRequest {
    pub resumes: Vec<ResumeRecord>,
    pub job: Option<JobRequirement>,
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedReport {
    /// 1-based position after sorting by total.
    pub rank: usize,
    /// Position of the résumé in the request.
    pub index: usize,
    pub report: ScoreReport,
}

#[derive(Serialize)]
pub struct BatchScoreResponse {
    pub results: Vec<RankedReport>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Scores a pair through the cache and attaches recommendations.
pub async fn score_pair(
    state: &AppState,
    resume: ResumeRecord,
    job: JobRequirement,
    industry: Option<String>,
) -> Result<ScoreResponse, AppError> {
    let resume = Arc::new(resume);
    let job = Arc::new(job);
    let (report, cached) = score_with_cache(
        Arc::clone(&state.scorer),
        state.cache.clone(),
        Arc::clone(&resume),
        Arc::clone(&job),
        industry,
    )
    .await?;
    let recommendations = generate(&report, &resume, &job);
    Ok(ScoreResponse {
        report,
        recommendations,
        cached,
    })
}

/// POST /api/v1/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (resume, job) = require_inputs(req.resume, req.job)?;
    Ok(Json(score_pair(&state, resume, job, req.industry).await?))
}

/// POST /api/v1/score/text
pub async fn handle_score_text(
    State(state): State<AppState>,
    Json(req): Json<ScoreTextRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".to_string()));
    }
    if req.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text must not be empty".to_string()));
    }

    let resume = state.resume_parser.parse(&req.resume_text);
    let job = state.jd_extractor.extract(&req.job_text);
    Ok(Json(score_pair(&state, resume, job, req.industry).await?))
}

/// POST /api/v1/score/batch
pub async fn handle_score_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchScoreRequest>,
) -> Result<Json<BatchScoreResponse>, AppError> {
    let job = req.job.ok_or_else(|| AppError::Validation("missing required input: job".to_string()))?;
    if req.resumes.is_empty() {
        return Err(AppError::Validation("resumes must not be empty".to_string()));
    }
    if req.resumes.len() > MAX_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "A batch holds at most {MAX_BATCH_SIZE} résumés (got {})",
            req.resumes.len()
        )));
    }

    let count = req.resumes.len();
    let job = Arc::new(job);
    let mut set = JoinSet::new();
    for (index, resume) in req.resumes.into_iter().enumerate() {
        let scorer = Arc::clone(&state.scorer);
        let job = Arc::clone(&job);
        let industry = req.industry.clone();
        set.spawn_blocking(move || {
            build_report(scorer.as_ref(), &resume, &job, industry.as_deref()).map(|r| (index, r))
        });
    }

    let mut scored = Vec::with_capacity(count);
    while let Some(result) = set.join_next().await {
        let pair = result
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Batch scoring task failed: {e}")))??;
        scored.push(pair);
    }

    info!("Scored batch of {count} résumés");
    Ok(Json(BatchScoreResponse {
        results: rank(scored),
    }))
}

/// GET /api/v1/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<ScoringStats>, AppError> {
    Ok(Json(scoring_stats(&state.db).await?))
}

/// Highest total first; equal totals keep request order.
fn rank(mut scored: Vec<(usize, ScoreReport)>) -> Vec<RankedReport> {
    scored.sort_by(|(ia, a), (ib, b)| {
        b.breakdown
            .total
            .total_cmp(&a.breakdown.total)
            .then(ia.cmp(ib))
    });
    scored
        .into_iter()
        .enumerate()
        .map(|(pos, (index, report))| RankedReport {
            rank: pos + 1,
            index,
            report,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::models::SkillRequirement;
    use crate::scoring::scorer::WeightedScorer;

    fn report_for(skills: &[&str]) -> ScoreReport {
        let resume = ResumeRecord {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let job = JobRequirement {
            skills: vec![
                SkillRequirement::required("Python"),
                SkillRequirement::required("AWS"),
            ],
            ..Default::default()
        };
        build_report(&WeightedScorer::default(), &resume, &job, None).unwrap()
    }

    #[test]
    fn test_rank_orders_by_total_then_index() {
        let scored = vec![
            (0, report_for(&["Python"])),
            (1, report_for(&["Python", "AWS"])),
            (2, report_for(&["AWS"])),
            (3, report_for(&[])),
        ];
        let ranked = rank(scored);

        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }
}
