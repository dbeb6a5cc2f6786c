//! Job templates: a posting's text plus the requirement extracted from it.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::JobTemplateRow;
use crate::scoring::models::JobRequirement;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

pub struct NewJobTemplate<'a> {
    pub title: &'a str,
    pub company: Option<&'a str>,
    pub description: &'a str,
    pub requirements: &'a JobRequirement,
}

pub fn requirement_from_row(row: &JobTemplateRow) -> Result<JobRequirement> {
    serde_json::from_value(row.requirements.clone())
        .with_context(|| format!("Stored requirements for job template {} are malformed", row.id))
}

/// `ILIKE` pattern matching `query` literally anywhere in a column.
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub async fn insert_job(pool: &PgPool, new: NewJobTemplate<'_>) -> Result<JobTemplateRow> {
    let requirements =
        serde_json::to_value(new.requirements).context("Failed to serialise job requirement")?;

    let row = sqlx::query_as::<_, JobTemplateRow>(
        r#"
        INSERT INTO job_templates (id, title, company, description, requirements)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.title)
    .bind(new.company)
    .bind(new.description)
    .bind(requirements)
    .fetch_one(pool)
    .await?;

    info!("Stored job template {} ({})", row.id, row.title);
    Ok(row)
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobTemplateRow>> {
    Ok(sqlx::query_as::<_, JobTemplateRow>("SELECT * FROM job_templates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Newest first. With a query, only templates whose title, company or
/// description contains it (case-insensitive).
pub async fn list_jobs(pool: &PgPool, query: Option<&str>, limit: i64) -> Result<Vec<JobTemplateRow>> {
    let limit = limit.clamp(1, MAX_LIST_LIMIT);

    let rows = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            sqlx::query_as::<_, JobTemplateRow>(
                r#"
                SELECT * FROM job_templates
                WHERE title ILIKE $1 OR company ILIKE $1 OR description ILIKE $1
                ORDER BY created_at DESC
                LIMIT $2
                "#,
            )
            .bind(like_pattern(q))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, JobTemplateRow>(
                "SELECT * FROM job_templates ORDER BY created_at DESC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern(" 100%_done "), "%100\\%\\_done%");
    }

    #[test]
    fn test_requirement_from_row_round_trip() {
        let job = JobRequirement {
            title: Some("Backend Engineer".into()),
            min_experience_months: 36,
            ..Default::default()
        };
        let row = JobTemplateRow {
            id: Uuid::nil(),
            title: "Backend Engineer".into(),
            company: None,
            description: "Build APIs".into(),
            requirements: serde_json::to_value(&job).unwrap(),
            created_at: chrono::Utc::now(),
        };
        assert_eq!(requirement_from_row(&row).unwrap(), job);
    }
}
