use std::str::FromStr;

use anyhow::{Context, Result};

use crate::extract::ExtractionLimits;
use crate::scoring::weights::{ScoringWeights, WeightsError};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Score cache is disabled when unset.
    pub redis_url: Option<String>,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    pub weights: ScoringWeights,
    /// Set when the configured weights were rejected and the defaults are in use.
    pub weights_fallback: Option<WeightsError>,
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
    pub score_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let lookup = |key: &str| std::env::var(key).ok();
        let (weights, weights_fallback) = weights_from(lookup)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            weights,
            weights_fallback,
            max_file_size: parse_env("MAX_FILE_SIZE", 10 * 1024 * 1024)?,
            allowed_extensions: parse_extensions(
                &std::env::var("ALLOWED_EXTENSIONS").unwrap_or_else(|_| "pdf,docx,txt".to_string()),
            ),
            score_cache_ttl_secs: parse_env("SCORE_CACHE_TTL_SECS", 86_400)?,
        })
    }

    pub fn extraction_limits(&self) -> ExtractionLimits {
        ExtractionLimits {
            max_bytes: self.max_file_size,
            allowed_extensions: self.allowed_extensions.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .ok()
        .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'"))
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Reads the five `SCORING_WEIGHTS_*` variables through `lookup`.
///
/// A non-numeric value is a startup error. A set that fails validation falls
/// back to the defaults and reports why.
fn weights_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(ScoringWeights, Option<WeightsError>)> {
    let defaults = ScoringWeights::default();
    let read = |key: &str, default: f64| -> Result<f64> {
        match lookup(key) {
            Some(raw) => parse_value(key, &raw),
            None => Ok(default),
        }
    };

    let configured = ScoringWeights::new(
        read("SCORING_WEIGHTS_TECHNICAL", defaults.technical_skills)?,
        read("SCORING_WEIGHTS_SOFT", defaults.soft_skills)?,
        read("SCORING_WEIGHTS_EXPERIENCE", defaults.experience)?,
        read("SCORING_WEIGHTS_EDUCATION", defaults.education)?,
        read("SCORING_WEIGHTS_KEYWORDS", defaults.keywords)?,
    );

    Ok(match configured {
        Ok(weights) => (weights, None),
        Err(e) => (defaults, Some(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_weights_default_when_unset() {
        let (weights, fallback) = weights_from(lookup_from(&[])).unwrap();
        assert_eq!(weights, ScoringWeights::default());
        assert!(fallback.is_none());
    }

    #[test]
    fn test_weights_override() {
        let (weights, fallback) = weights_from(lookup_from(&[
            ("SCORING_WEIGHTS_TECHNICAL", "0.30"),
            ("SCORING_WEIGHTS_SOFT", "0.25"),
            ("SCORING_WEIGHTS_EXPERIENCE", "0.15"),
        ]))
        .unwrap();
        assert!(fallback.is_none());
        assert_eq!(weights.technical_skills, 0.30);
        assert_eq!(weights.soft_skills, 0.25);
        assert_eq!(weights.experience, 0.15);
        assert_eq!(weights.education, 0.15);
    }

    #[test]
    fn test_weights_bad_sum_falls_back() {
        let (weights, fallback) =
            weights_from(lookup_from(&[("SCORING_WEIGHTS_TECHNICAL", "0.9")])).unwrap();
        assert_eq!(weights, ScoringWeights::default());
        assert!(matches!(fallback, Some(WeightsError::BadSum(_))));
    }

    #[test]
    fn test_weights_non_numeric_is_error() {
        let result = weights_from(lookup_from(&[("SCORING_WEIGHTS_SOFT", "lots")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_extensions() {
        assert_eq!(parse_extensions("PDF, .docx,,txt "), vec!["pdf", "docx", "txt"]);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 9000 ").unwrap(), 9000);
        assert!(parse_value::<u16>("PORT", "http").is_err());
    }
}
