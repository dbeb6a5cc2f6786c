//! Score report cache keyed by the consistency hash.
//!
//! Identical inputs always produce identical reports, so a hit can be returned
//! as-is. Failures here never fail a request; callers log and carry on.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::scoring::report::ScoreReport;

const KEY_PREFIX: &str = "ats:score";

/// Upper bound on any single Redis round trip, connect included.
const REDIS_TIMEOUT: Duration = Duration::from_millis(500);

/// Cache key for a consistency hash scored against a benchmark industry.
pub fn cache_key(consistency_hash: &str, industry: &str) -> String {
    format!("{KEY_PREFIX}:{consistency_hash}:{}", industry.trim().to_lowercase())
}

/// Carried in `AppState` as `Option<Arc<dyn ScoreCache>>`.
#[async_trait]
pub trait ScoreCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ScoreReport>>;

    async fn put(&self, key: &str, report: &ScoreReport) -> Result<()>;
}

async fn bounded<T, F>(op: &str, fut: F) -> Result<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(REDIS_TIMEOUT, fut).await {
        Ok(result) => result.with_context(|| format!("Redis {op} failed")),
        Err(_) => anyhow::bail!("Redis {op} timed out after {}ms", REDIS_TIMEOUT.as_millis()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

/// One multiplexed connection opened at startup; each call works on a clone of it.
pub struct RedisScoreCache {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisScoreCache {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Invalid REDIS_URL")?;
        let conn = bounded("connect", client.get_multiplexed_async_connection()).await?;
        Ok(Self { conn, ttl_secs })
    }
}

#[async_trait]
impl ScoreCache for RedisScoreCache {
    async fn get(&self, key: &str) -> Result<Option<ScoreReport>> {
        let mut conn = self.conn.clone();
        let cached: Option<String> = bounded("GET", conn.get(key)).await?;
        cached
            .map(|json| serde_json::from_str(&json).context("Corrupt cached score report"))
            .transpose()
    }

    async fn put(&self, key: &str, report: &ScoreReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        let mut conn = self.conn.clone();
        bounded::<(), _>("SET", conn.set_ex(key, json, self.ttl_secs)).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend for tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryScoreCache {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryScoreCache {
        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScoreCache for MemoryScoreCache {
        async fn get(&self, key: &str) -> Result<Option<ScoreReport>> {
            let entries = self.entries.lock().unwrap();
            entries
                .get(key)
                .map(|json| serde_json::from_str(json).map_err(Into::into))
                .transpose()
        }

        async fn put(&self, key: &str, report: &ScoreReport) -> Result<()> {
            let json = serde_json::to_string(report)?;
            self.entries.lock().unwrap().insert(key.to_string(), json);
            Ok(())
        }
    }
}
