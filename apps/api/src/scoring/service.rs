//! Cache-aware report building shared by the scoring endpoints.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{cache_key, ScoreCache};
use crate::errors::AppError;
use crate::scoring::models::{JobRequirement, ResumeRecord};
use crate::scoring::report::{build_report, consistency_hash, resolve_industry, ScoreReport};
use crate::scoring::scorer::Scorer;

/// Returns the report and whether it came from the cache.
///
/// Scoring runs on the blocking pool. Cache failures are logged and ignored.
pub async fn score_with_cache(
    scorer: Arc<dyn Scorer>,
    cache: Option<Arc<dyn ScoreCache>>,
    resume: Arc<ResumeRecord>,
    job: Arc<JobRequirement>,
    industry: Option<String>,
) -> Result<(ScoreReport, bool), AppError> {
    let key = match &cache {
        Some(_) => {
            let hash = consistency_hash(&resume, &job, scorer.weights())?;
            Some(cache_key(&hash, resolve_industry(industry.as_deref(), &job)))
        }
        None => None,
    };

    if let (Some(cache), Some(key)) = (&cache, &key) {
        match cache.get(key).await {
            Ok(Some(report)) => {
                debug!(key = %key, "Score cache hit");
                return Ok((report, true));
            }
            Ok(None) => debug!(key = %key, "Score cache miss"),
            Err(e) => warn!("Score cache read failed: {e:#}"),
        }
    }

    let report = {
        let scorer = Arc::clone(&scorer);
        let resume = Arc::clone(&resume);
        let job = Arc::clone(&job);
        tokio::task::spawn_blocking(move || {
            build_report(scorer.as_ref(), &resume, &job, industry.as_deref())
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Scoring task failed: {e}")))??
    };

    if let (Some(cache), Some(key)) = (&cache, &key) {
        if let Err(e) = cache.put(key, &report).await {
            warn!("Score cache write failed: {e:#}");
        }
    }

    Ok((report, false))
}
