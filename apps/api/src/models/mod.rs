use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub filename: String,
    /// Hex SHA-256 of the uploaded bytes. Unique.
    pub file_hash: String,
    pub s3_key: String,
    pub raw_text: String,
    /// Serialized `ResumeRecord`.
    pub parsed: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoringRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Option<Uuid>,
    pub overall_score: f64,
    /// Category key → sub-score.
    pub category_scores: Value,
    /// Serialized `ScoreReport`.
    pub report: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobTemplateRow {
    pub id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub description: String,
    /// Serialized `JobRequirement`.
    pub requirements: Value,
    pub created_at: DateTime<Utc>,
}
