//! Scoring history in `scoring_history`: one row per scored résumé/job pair.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::ScoringRow;
use crate::scoring::models::{Category, ScoreBreakdown};
use crate::scoring::report::ScoreReport;
use crate::scoring::scorer::round1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStats {
    fn from_row((average, min, max): (Option<f64>, Option<f64>, Option<f64>)) -> Self {
        Self {
            average: average.map(round1),
            min,
            max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringStats {
    pub total_scored: i64,
    pub overall: SummaryStats,
    pub categories: BTreeMap<Category, SummaryStats>,
}

/// Category key → sub-score, the shape stored in `category_scores`.
pub fn category_scores_json(breakdown: &ScoreBreakdown) -> Value {
    let map: serde_json::Map<String, Value> = breakdown
        .sub_scores()
        .into_iter()
        .map(|(c, s)| (c.key().to_string(), Value::from(s)))
        .collect();
    Value::Object(map)
}

pub async fn record_score(
    pool: &PgPool,
    resume_id: Uuid,
    job_id: Option<Uuid>,
    report: &ScoreReport,
) -> Result<ScoringRow> {
    let report_json = serde_json::to_value(report).context("Failed to serialise score report")?;

    let row = sqlx::query_as::<_, ScoringRow>(
        r#"
        INSERT INTO scoring_history
            (id, resume_id, job_id, overall_score, category_scores, report)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(job_id)
    .bind(report.breakdown.total)
    .bind(category_scores_json(&report.breakdown))
    .bind(report_json)
    .fetch_one(pool)
    .await?;

    info!(
        "Recorded score {} for resume {resume_id} (history {})",
        row.overall_score, row.id
    );
    Ok(row)
}

/// Newest first.
pub async fn history_for_resume(pool: &PgPool, resume_id: Uuid) -> Result<Vec<ScoringRow>> {
    Ok(sqlx::query_as::<_, ScoringRow>(
        "SELECT * FROM scoring_history WHERE resume_id = $1 ORDER BY created_at DESC, id",
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await?)
}

pub async fn latest_score(pool: &PgPool, resume_id: Uuid) -> Result<Option<ScoringRow>> {
    Ok(sqlx::query_as::<_, ScoringRow>(
        "SELECT * FROM scoring_history WHERE resume_id = $1 ORDER BY created_at DESC, id LIMIT 1",
    )
    .bind(resume_id)
    .fetch_optional(pool)
    .await?)
}

/// Count, average, min and max of the overall score, plus the same per category.
pub async fn scoring_stats(pool: &PgPool) -> Result<ScoringStats> {
    let (total_scored, average, min, max): (i64, Option<f64>, Option<f64>, Option<f64>) =
        sqlx::query_as(
            "SELECT COUNT(*), AVG(overall_score), MIN(overall_score), MAX(overall_score) FROM scoring_history",
        )
        .fetch_one(pool)
        .await?;

    let mut categories = BTreeMap::new();
    for category in Category::ALL {
        // Keys come from `Category::key`, never from input.
        let sql = format!(
            "SELECT AVG((category_scores->>'{key}')::float8), \
                    MIN((category_scores->>'{key}')::float8), \
                    MAX((category_scores->>'{key}')::float8) \
             FROM scoring_history",
            key = category.key()
        );
        let row: (Option<f64>, Option<f64>, Option<f64>) =
            sqlx::query_as(&sql).fetch_one(pool).await?;
        categories.insert(category, SummaryStats::from_row(row));
    }

    Ok(ScoringStats {
        total_scored,
        overall: SummaryStats::from_row((average, min, max)),
        categories,
    })
}
