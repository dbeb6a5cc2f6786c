//! Weighted ATS scorer.
//!
//! Five category sub-scores in [0, 100], combined with `ScoringWeights` into a
//! total in [0, 100]. Pure and deterministic: no I/O, no clock, no randomness.
//!
//! `AppState` holds an `Arc<dyn Scorer>`; `WeightedScorer` is the default backend.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::knowledge::taxonomy::canonical_name;
use crate::scoring::matching::{contains_term, SkillMatcher, StemmedText};
use crate::scoring::models::{DegreeLevel, JobRequirement, ResumeRecord, ScoreBreakdown};
use crate::scoring::weights::ScoringWeights;

/// Soft skills looked for in the résumé's free text.
pub const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "collaboration",
    "problem solving",
    "critical thinking",
    "adaptability",
    "time management",
    "creativity",
    "attention to detail",
];

const PREFERRED_WEIGHT: f64 = 0.5;

/// Credit for a candidate exactly one degree level below the requirement.
const ONE_LEVEL_BELOW_CREDIT: f64 = 60.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("missing required input: {0}")]
    MissingInput(&'static str),
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// What matched and what did not, per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub matched_required_skills: Vec<String>,
    pub missing_required_skills: Vec<String>,
    pub matched_preferred_skills: Vec<String>,
    pub missing_preferred_skills: Vec<String>,
    pub soft_skills_found: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub relevant_experience_months: u32,
    pub total_experience_months: u32,
    pub candidate_degree: DegreeLevel,
    pub required_degree: DegreeLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvaluation {
    pub breakdown: ScoreBreakdown,
    pub details: ScoreDetails,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scoring backend. Implement this to swap algorithms without touching handlers.
pub trait Scorer: Send + Sync {
    fn evaluate(&self, resume: &ResumeRecord, job: &JobRequirement) -> ScoreEvaluation;

    fn weights(&self) -> &ScoringWeights;

    fn backend(&self) -> &'static str;

    fn score(&self, resume: &ResumeRecord, job: &JobRequirement) -> ScoreBreakdown {
        self.evaluate(resume, job).breakdown
    }
}

/// Both records must be present; empty collections inside them are fine.
pub fn require_inputs(
    resume: Option<ResumeRecord>,
    job: Option<JobRequirement>,
) -> Result<(ResumeRecord, JobRequirement), ScoringError> {
    let resume = resume.ok_or(ScoringError::MissingInput("resume"))?;
    let job = job.ok_or(ScoringError::MissingInput("job"))?;
    Ok((resume, job))
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl Scorer for WeightedScorer {
    fn evaluate(&self, resume: &ResumeRecord, job: &JobRequirement) -> ScoreEvaluation {
        let mut details = ScoreDetails {
            candidate_degree: resume.highest_degree(),
            required_degree: job.education,
            total_experience_months: resume.total_experience_months(),
            ..Default::default()
        };

        let technical_skills = round1(technical_score(resume, job, &mut details));
        let soft_skills = round1(soft_skill_score(resume, &mut details));
        let experience = round1(experience_score(resume, job, &mut details));
        let education = round1(education_score(job.education, resume.highest_degree()));
        let keywords = round1(keyword_score(resume, job, &mut details));

        let w = &self.weights;
        let total = round1(
            (w.technical_skills * technical_skills
                + w.soft_skills * soft_skills
                + w.experience * experience
                + w.education * education
                + w.keywords * keywords)
                .clamp(0.0, 100.0),
        );

        debug!(
            technical_skills,
            soft_skills, experience, education, keywords, total, "Scored résumé"
        );

        ScoreEvaluation {
            breakdown: ScoreBreakdown {
                technical_skills,
                soft_skills,
                experience,
                education,
                keywords,
                total,
            },
            details,
        }
    }

    fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn backend(&self) -> &'static str {
        "weighted"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Category algorithms
// ────────────────────────────────────────────────────────────────────────────

/// Required skills weigh 1.0, preferred 0.5. The denominator is the required
/// total only, so a missing preferred skill costs nothing but its bonus.
fn technical_score(resume: &ResumeRecord, job: &JobRequirement, details: &mut ScoreDetails) -> f64 {
    let required = dedup_skills(job.required_skills(), &BTreeSet::new());
    let required_keys: BTreeSet<String> = required.iter().map(|s| s.to_lowercase()).collect();
    let preferred = dedup_skills(job.preferred_skills(), &required_keys);

    let matcher = SkillMatcher::new(&resume.skills);
    let (matched_req, missing_req): (Vec<String>, Vec<String>) =
        required.into_iter().partition(|s| matcher.matches(s));
    let (matched_pref, missing_pref): (Vec<String>, Vec<String>) =
        preferred.into_iter().partition(|s| matcher.matches(s));

    let required_total = (matched_req.len() + missing_req.len()) as f64;
    let preferred_total = (matched_pref.len() + missing_pref.len()) as f64;

    let score = if matcher.is_empty() {
        0.0
    } else if required_total > 0.0 {
        let earned = matched_req.len() as f64 + PREFERRED_WEIGHT * matched_pref.len() as f64;
        earned / required_total * 100.0
    } else if preferred_total > 0.0 {
        matched_pref.len() as f64 / preferred_total * 100.0
    } else {
        0.0
    };

    details.matched_required_skills = matched_req;
    details.missing_required_skills = missing_req;
    details.matched_preferred_skills = matched_pref;
    details.missing_preferred_skills = missing_pref;

    score.min(100.0)
}

/// Proportion of `SOFT_SKILLS` found in the free text, skills and experience descriptions.
fn soft_skill_score(resume: &ResumeRecord, details: &mut ScoreDetails) -> f64 {
    let text = StemmedText::new(&free_text(resume));
    let found: Vec<String> = SOFT_SKILLS
        .iter()
        .filter(|s| text.contains_phrase(s))
        .map(|s| s.to_string())
        .collect();

    let score = found.len() as f64 / SOFT_SKILLS.len() as f64 * 100.0;
    details.soft_skills_found = found;
    score
}

/// Relevant months over the minimum required, capped at 100.
fn experience_score(resume: &ResumeRecord, job: &JobRequirement, details: &mut ScoreDetails) -> f64 {
    let relevant_months: u32 = resume
        .experience
        .iter()
        .filter(|entry| {
            if job.keywords.is_empty() {
                return true;
            }
            let text = StemmedText::new(&format!("{} {}", entry.role, entry.description));
            job.keywords.iter().any(|kw| text.contains_phrase(kw))
        })
        .map(|entry| entry.duration_months)
        .sum();
    details.relevant_experience_months = relevant_months;

    if job.min_experience_months == 0 {
        return if resume.experience.is_empty() { 0.0 } else { 100.0 };
    }

    (relevant_months as f64 / job.min_experience_months as f64 * 100.0).min(100.0)
}

/// Discrete lookup: meets or exceeds → 100, one level below → 60, otherwise 0.
pub fn education_score(required: DegreeLevel, candidate: DegreeLevel) -> f64 {
    if required == DegreeLevel::None || candidate >= required {
        100.0
    } else if candidate != DegreeLevel::None && required.rank() - candidate.rank() == 1 {
        ONE_LEVEL_BELOW_CREDIT
    } else {
        0.0
    }
}

/// Proportion of target keywords present anywhere in the résumé text, skills or descriptions.
fn keyword_score(resume: &ResumeRecord, job: &JobRequirement, details: &mut ScoreDetails) -> f64 {
    if job.keywords.is_empty() {
        return 0.0;
    }

    let text = free_text(resume);
    let lower = text.to_lowercase();
    let stemmed = StemmedText::new(&text);
    let matcher = SkillMatcher::new(resume.skills.iter().chain(resume.keywords.iter()));

    let (matched, missing): (Vec<String>, Vec<String>) =
        job.keywords.iter().cloned().partition(|kw| {
            contains_term(&lower, &kw.to_lowercase())
                || stemmed.contains_phrase(kw)
                || matcher.matches(kw)
        });

    let score = matched.len() as f64 / job.keywords.len() as f64 * 100.0;
    details.matched_keywords = matched;
    details.missing_keywords = missing;
    score
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Canonicalises and deduplicates skill names, keeping first-seen order and
/// dropping anything already in `exclude` (lowercase canonical names).
fn dedup_skills<'a>(
    skills: impl Iterator<Item = &'a str>,
    exclude: &BTreeSet<String>,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for skill in skills {
        let name = canonical_name(skill);
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if exclude.contains(&key) || !seen.insert(key) {
            continue;
        }
        out.push(name);
    }
    out
}

fn free_text(resume: &ResumeRecord) -> String {
    let mut parts: Vec<&str> = vec![resume.raw_text.as_str()];
    parts.extend(resume.skills.iter().map(String::as_str));
    parts.extend(resume.keywords.iter().map(String::as_str));
    parts.extend(resume.experience.iter().map(|e| e.description.as_str()));
    parts.join("\n")
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
