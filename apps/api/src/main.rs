mod cache;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod knowledge;
mod models;
mod parsing;
mod recommendations;
mod resumes;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cache::{RedisScoreCache, ScoreCache};
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::parsing::jd_parser::RuleBasedRequirementExtractor;
use crate::parsing::resume_parser::RuleBasedResumeParser;
use crate::routes::build_router;
use crate::scoring::scorer::WeightedScorer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS scorer API v{}", env!("CARGO_PKG_VERSION"));

    if let Some(reason) = &config.weights_fallback {
        warn!("Ignoring configured scoring weights ({reason}); using defaults");
    }
    info!("Scoring weights: {:?}", config.weights);

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize Redis score cache (optional)
    let cache: Option<Arc<dyn ScoreCache>> = match &config.redis_url {
        Some(url) => match RedisScoreCache::connect(url, config.score_cache_ttl_secs).await {
            Ok(cache) => {
                info!("Score cache enabled (ttl {}s)", config.score_cache_ttl_secs);
                Some(Arc::new(cache))
            }
            Err(e) => {
                warn!("Score cache disabled: {e:#}");
                None
            }
        },
        None => {
            info!("REDIS_URL not set; score cache disabled");
            None
        }
    };

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Build app state
    let state = AppState {
        db,
        cache,
        s3,
        config: config.clone(),
        scorer: Arc::new(WeightedScorer::new(config.weights)),
        resume_parser: Arc::new(RuleBasedResumeParser::rolling()),
        jd_extractor: Arc::new(RuleBasedRequirementExtractor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "ats-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
