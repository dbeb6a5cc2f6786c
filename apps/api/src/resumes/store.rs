//! Stored résumés: original file in S3, text and parsed record in `resumes`.

use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use serde_json::Value;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::ResumeRow;
use crate::scoring::models::ResumeRecord;

pub struct NewResume<'a> {
    pub id: Uuid,
    pub filename: &'a str,
    pub file_hash: &'a str,
    pub s3_key: &'a str,
    pub raw_text: &'a str,
    pub parsed: &'a ResumeRecord,
}

/// Hex SHA-256 of the uploaded bytes, used for duplicate detection.
pub fn file_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// `resumes/{id}/{filename}` with anything outside `[A-Za-z0-9._-]` replaced.
pub fn s3_key_for(id: Uuid, filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("resumes/{id}/{safe}")
}

pub fn record_from_row(row: &ResumeRow) -> Result<ResumeRecord> {
    serde_json::from_value(row.parsed.clone())
        .with_context(|| format!("Stored record for resume {} is malformed", row.id))
}

pub async fn upload_original(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    data: Bytes,
    content_type: &str,
) -> Result<()> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(())
}

pub async fn delete_original(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) -> Result<()> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 delete failed: {e}"))?;

    info!("Removed s3://{bucket}/{key}");
    Ok(())
}

/// Inserts the row. On a hash collision the already stored row wins and is returned.
pub async fn insert_resume(pool: &PgPool, new: NewResume<'_>) -> Result<ResumeRow> {
    let parsed: Value = serde_json::to_value(new.parsed).context("Failed to serialise resume record")?;

    let inserted = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, filename, file_hash, s3_key, raw_text, parsed)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (file_hash) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.filename)
    .bind(new.file_hash)
    .bind(new.s3_key)
    .bind(new.raw_text)
    .bind(parsed)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(row) => {
            info!("Stored resume {} ({})", row.id, row.filename);
            Ok(row)
        }
        None => find_by_hash(pool, new.file_hash)
            .await?
            .context("Resume vanished after a duplicate-hash insert"),
    }
}

pub async fn find_by_hash(pool: &PgPool, hash: &str) -> Result<Option<ResumeRow>> {
    Ok(
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE file_hash = $1")
            .bind(hash)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_resume(pool: &PgPool, id: Uuid) -> Result<Option<ResumeRow>> {
    Ok(sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}
