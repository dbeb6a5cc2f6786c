//! Score report: the breakdown plus benchmark, confidence interval, grade and
//! the consistency hash used as the cache key.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::knowledge::industry::{industry_profile, GENERAL};
use crate::scoring::models::{JobRequirement, ResumeRecord, ScoreBreakdown};
use crate::scoring::scorer::{round1, ScoreDetails, Scorer};
use crate::scoring::weights::ScoringWeights;

/// z-value for a 95% interval.
const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub industry: String,
    pub industry_average: f64,
    pub top_percentile: f64,
    pub performance_level: String,
    pub percentile: u32,
    pub gap_to_average: f64,
    pub gap_to_top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub breakdown: ScoreBreakdown,
    pub details: ScoreDetails,
    pub weights: ScoringWeights,
    pub confidence_interval: ConfidenceInterval,
    pub benchmark: BenchmarkComparison,
    pub grade: char,
    pub level: String,
    pub interpretation: String,
    pub consistency_hash: String,
    pub scorer_backend: String,
}

/// Scores the pair and wraps the result. Industry defaults to the job's, then `general`.
pub fn build_report(
    scorer: &dyn Scorer,
    resume: &ResumeRecord,
    job: &JobRequirement,
    industry: Option<&str>,
) -> Result<ScoreReport> {
    let evaluation = scorer.evaluate(resume, job);
    let breakdown = evaluation.breakdown;
    let industry = resolve_industry(industry, job);

    Ok(ScoreReport {
        confidence_interval: confidence_interval(&breakdown),
        benchmark: compare_with_benchmark(breakdown.total, industry),
        grade: letter_grade(breakdown.total),
        level: performance_level(breakdown.total).to_string(),
        interpretation: interpretation(breakdown.total).to_string(),
        consistency_hash: consistency_hash(resume, job, scorer.weights())?,
        weights: *scorer.weights(),
        scorer_backend: scorer.backend().to_string(),
        breakdown,
        details: evaluation.details,
    })
}

/// Benchmark industry for a run: the caller's choice, else the job's, else `general`.
pub fn resolve_industry<'a>(requested: Option<&'a str>, job: &'a JobRequirement) -> &'a str {
    requested
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .or(job.industry.as_deref())
        .unwrap_or(GENERAL)
}

/// Hex SHA-256 over the canonical JSON of both records and the weights.
pub fn consistency_hash(
    resume: &ResumeRecord,
    job: &JobRequirement,
    weights: &ScoringWeights,
) -> Result<String> {
    let payload = serde_json::to_vec(&(resume, job, weights))
        .context("Failed to serialise scoring inputs for hashing")?;
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    Ok(hex::encode(hasher.finalize()))
}

/// total ± 1.96·σ/√n over the five sub-scores, clamped to [0, 100].
pub fn confidence_interval(breakdown: &ScoreBreakdown) -> ConfidenceInterval {
    let scores = breakdown.sub_scores().map(|(_, s)| s);
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let margin = Z_95 * variance.sqrt() / n.sqrt();

    ConfidenceInterval {
        lower: round1((breakdown.total - margin).max(0.0)),
        upper: round1((breakdown.total + margin).min(100.0)),
    }
}

pub fn compare_with_benchmark(total: f64, industry: &str) -> BenchmarkComparison {
    let profile = industry_profile(industry);
    let avg = profile.average_score;
    let top = profile.top_percentile;

    let (performance_level, percentile) = if total >= top {
        ("Top 10%", 95)
    } else if total >= avg + 10.0 {
        ("Above Average", 75)
    } else if total >= avg {
        ("Average", 50)
    } else if total >= avg - 10.0 {
        ("Below Average", 25)
    } else {
        ("Needs Significant Improvement", 10)
    };

    BenchmarkComparison {
        industry: profile.name.to_string(),
        industry_average: avg,
        top_percentile: top,
        performance_level: performance_level.to_string(),
        percentile,
        gap_to_average: round1(total - avg),
        gap_to_top: round1(total - top),
    }
}

pub fn letter_grade(total: f64) -> char {
    match total {
        t if t >= 90.0 => 'A',
        t if t >= 80.0 => 'B',
        t if t >= 70.0 => 'C',
        t if t >= 60.0 => 'D',
        _ => 'F',
    }
}

/// Level label shared by the total and per-category scores.
pub fn performance_level(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellent"
    } else if score >= 75.0 {
        "Good"
    } else if score >= 60.0 {
        "Fair"
    } else {
        "Needs Improvement"
    }
}

pub fn interpretation(total: f64) -> &'static str {
    if total >= 90.0 {
        "Excellent - Top candidate profile"
    } else if total >= 75.0 {
        "Good - Strong candidate"
    } else if total >= 60.0 {
        "Fair - Some improvements needed"
    } else {
        "Needs significant improvement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::models::SkillRequirement;
    use crate::scoring::scorer::WeightedScorer;

    fn breakdown(subs: [f64; 5], total: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            technical_skills: subs[0],
            soft_skills: subs[1],
            experience: subs[2],
            education: subs[3],
            keywords: subs[4],
            total,
        }
    }

    fn sample_pair() -> (ResumeRecord, JobRequirement) {
        let resume = ResumeRecord {
            skills: ["Python".to_string()].into_iter().collect(),
            raw_text: "Python developer".to_string(),
            ..Default::default()
        };
        let job = JobRequirement {
            skills: vec![SkillRequirement::required("Python")],
            industry: Some("finance".to_string()),
            ..Default::default()
        };
        (resume, job)
    }

    #[test]
    fn test_confidence_interval_zero_spread() {
        let ci = confidence_interval(&breakdown([80.0; 5], 80.0));
        assert_eq!(ci, ConfidenceInterval { lower: 80.0, upper: 80.0 });
    }

    #[test]
    fn test_confidence_interval_clamped() {
        let ci = confidence_interval(&breakdown([100.0, 0.0, 100.0, 0.0, 100.0], 98.0));
        assert_eq!(ci.upper, 100.0);
        assert!(ci.lower < 98.0);
    }

    #[test]
    fn test_confidence_interval_margin() {
        // σ = √320 over [40, 80, 40, 80, 60]; margin = 1.96 · √320 / √5 = 15.68
        let ci = confidence_interval(&breakdown([40.0, 80.0, 40.0, 80.0, 60.0], 60.0));
        assert_eq!(ci.lower, 44.3);
        assert_eq!(ci.upper, 75.7);
    }

    #[test]
    fn test_benchmark_levels_technology() {
        assert_eq!(compare_with_benchmark(91.0, "technology").performance_level, "Top 10%");
        assert_eq!(compare_with_benchmark(85.0, "technology").performance_level, "Above Average");
        assert_eq!(compare_with_benchmark(75.0, "technology").performance_level, "Average");
        assert_eq!(compare_with_benchmark(66.0, "technology").performance_level, "Below Average");
        let poor = compare_with_benchmark(40.0, "technology");
        assert_eq!(poor.performance_level, "Needs Significant Improvement");
        assert_eq!(poor.percentile, 10);
        assert_eq!(poor.gap_to_average, -35.0);
    }

    #[test]
    fn test_benchmark_unknown_industry_uses_general() {
        let cmp = compare_with_benchmark(70.0, "shipbuilding");
        assert_eq!(cmp.industry, "general");
        assert_eq!(cmp.performance_level, "Average");
    }

    #[test]
    fn test_letter_grades() {
        assert_eq!(letter_grade(95.0), 'A');
        assert_eq!(letter_grade(80.0), 'B');
        assert_eq!(letter_grade(79.9), 'C');
        assert_eq!(letter_grade(60.0), 'D');
        assert_eq!(letter_grade(12.0), 'F');
    }

    #[test]
    fn test_levels_and_interpretation() {
        assert_eq!(performance_level(90.0), "Excellent");
        assert_eq!(performance_level(75.0), "Good");
        assert_eq!(performance_level(60.0), "Fair");
        assert_eq!(performance_level(59.9), "Needs Improvement");
        assert_eq!(interpretation(76.0), "Good - Strong candidate");
    }

    #[test]
    fn test_consistency_hash_stable_and_sensitive() {
        let (resume, job) = sample_pair();
        let weights = ScoringWeights::default();
        let a = consistency_hash(&resume, &job, &weights).unwrap();
        let b = consistency_hash(&resume, &job, &weights).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let other = ScoringWeights::new(0.30, 0.25, 0.15, 0.15, 0.15).unwrap();
        assert_ne!(a, consistency_hash(&resume, &job, &other).unwrap());
    }

    #[test]
    fn test_build_report_uses_job_industry() {
        let (resume, job) = sample_pair();
        let scorer = WeightedScorer::default();
        let report = build_report(&scorer, &resume, &job, None).unwrap();
        assert_eq!(report.benchmark.industry, "finance");
        assert_eq!(report.breakdown.technical_skills, 100.0);
        assert_eq!(report.scorer_backend, "weighted");

        let overridden = build_report(&scorer, &resume, &job, Some("marketing")).unwrap();
        assert_eq!(overridden.benchmark.industry, "marketing");
        assert_eq!(overridden.consistency_hash, report.consistency_hash);
    }
}
