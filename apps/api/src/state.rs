use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::cache::ScoreCache;
use crate::config::Config;
use crate::parsing::jd_parser::RequirementExtractor;
use crate::parsing::resume_parser::ResumeParser;
use crate::scoring::scorer::Scorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Score report cache. `None` when `REDIS_URL` is unset.
    pub cache: Option<Arc<dyn ScoreCache>>,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable scoring backend. Default: WeightedScorer with the configured weights.
    pub scorer: Arc<dyn Scorer>,
    pub resume_parser: Arc<dyn ResumeParser>,
    pub jd_extractor: Arc<dyn RequirementExtractor>,
}
