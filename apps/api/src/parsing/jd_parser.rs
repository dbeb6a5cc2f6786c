//! Requirement Extractor: raw job-description text → `JobRequirement`.
//!
//! The text is cut into clauses (lines, sentences, `;`-separated parts). Each
//! clause inherits the mode of the block it sits in ("Requirements:",
//! "Nice to have:", "About us:") unless it carries its own marker
//! ("Kafka experience a plus").

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::knowledge::industry::detect_industry;
use crate::parsing::resume_parser::scan_dictionary_skills;
use crate::parsing::vocabulary::{degree_levels_in, DOMAIN_TERMS, YEARS_RE};
use crate::scoring::matching::contains_term;
use crate::scoring::models::{DegreeLevel, JobRequirement, SkillImportance, SkillRequirement};

const MAX_TITLE_LEN: usize = 100;
const MAX_HEADING_WORDS: usize = 5;

static PREFERRED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:preferred|nice[\s-]to[\s-]have|bonus|a plus|pluses|desired|desirable)\b").unwrap()
});

static REQUIRED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:required|requirements?|must[\s-]haves?|must|qualifications|minimum|what you need)\b").unwrap()
});

static IGNORED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:about(?:\s+(?:us|the company|the team))?$|benefits|perks|compensation|who we are|our company|equal opportunity)").unwrap()
});

/// "5+ years" without the word "experience"; only trusted inside required clauses.
static LOOSE_YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").unwrap());

static DEGREE_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bdegree\b").unwrap());

/// Extraction strategy for job descriptions.
pub trait RequirementExtractor: Send + Sync {
    fn extract(&self, text: &str) -> JobRequirement;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedRequirementExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Unmarked,
    Required,
    Preferred,
    /// Company blurbs and benefits: searched for keywords, never for requirements.
    Ignored,
}

#[derive(Debug)]
struct Clause<'a> {
    text: &'a str,
    mode: Mode,
}

impl RequirementExtractor for RuleBasedRequirementExtractor {
    fn extract(&self, text: &str) -> JobRequirement {
        let clauses = classify_clauses(text);
        let marked = clauses
            .iter()
            .any(|c| matches!(c.mode, Mode::Required | Mode::Preferred));

        let skills = extract_skills(&clauses, marked);
        let min_experience_months = extract_min_experience(&clauses);
        let education = extract_education(&clauses);

        let searchable: String = clauses
            .iter()
            .filter(|c| c.mode != Mode::Ignored)
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join("\n");
        let mut keywords = extract_keywords(&searchable);
        keywords.extend(
            skills
                .iter()
                .filter(|s| s.importance == SkillImportance::Required)
                .map(|s| s.name.clone()),
        );

        debug!(
            skills = skills.len(),
            min_experience_months,
            education = %education,
            keywords = keywords.len(),
            "Parsed job description"
        );

        JobRequirement {
            title: extract_title(text),
            industry: detect_industry(text).map(str::to_string),
            skills,
            min_experience_months,
            education,
            keywords,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Clause segmentation
// ────────────────────────────────────────────────────────────────────────────

fn classify_clauses(text: &str) -> Vec<Clause<'_>> {
    let mut clauses = Vec::new();
    let mut block = Mode::Unmarked;

    for line in text.lines() {
        for part in line.split(". ").flat_map(|s| s.split(';')) {
            let part = part
                .trim()
                .trim_start_matches(['•', '-', '*', '▪', '●', '·'])
                .trim()
                .trim_end_matches('.');
            if part.is_empty() {
                continue;
            }

            let mode = match heading_mode(part) {
                Some(mode) => {
                    block = mode;
                    mode
                }
                None if PREFERRED_RE.is_match(part) => Mode::Preferred,
                None if REQUIRED_RE.is_match(part) => Mode::Required,
                None => block,
            };
            clauses.push(Clause { text: part, mode });
        }
    }
    clauses
}

/// Mode set by a block heading ("Nice to have:", "Requirements"), if the clause is one.
fn heading_mode(clause: &str) -> Option<Mode> {
    let has_colon = clause.contains(':');
    let head = match clause.split_once(':') {
        Some((head, _)) => head.trim(),
        None if clause.split_whitespace().count() <= 3 => clause,
        None => return None,
    };
    if head.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }
    // without a colon the marker has to lead: "Nice to have", not "Master's preferred"
    let marks = |re: &Regex| re.find(head).is_some_and(|m| has_colon || m.start() == 0);

    if IGNORED_RE.is_match(head) {
        Some(Mode::Ignored)
    } else if marks(&PREFERRED_RE) {
        Some(Mode::Preferred)
    } else if marks(&REQUIRED_RE) {
        Some(Mode::Required)
    } else if has_colon {
        // "Responsibilities:" and friends close the previous block
        Some(Mode::Unmarked)
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fields
// ────────────────────────────────────────────────────────────────────────────

fn extract_title(text: &str) -> Option<String> {
    let first = text
        .lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty())?;
    (first.chars().count() <= MAX_TITLE_LEN).then(|| first.to_string())
}

/// Required wins when a skill shows up under both headings. Unmarked clauses
/// only count when the posting has no required/preferred markers at all.
fn extract_skills(clauses: &[Clause<'_>], marked: bool) -> Vec<SkillRequirement> {
    let mut found: BTreeMap<String, SkillImportance> = BTreeMap::new();

    for clause in clauses {
        let importance = match clause.mode {
            Mode::Required => SkillImportance::Required,
            Mode::Preferred => SkillImportance::Preferred,
            Mode::Unmarked if !marked => SkillImportance::Required,
            Mode::Unmarked | Mode::Ignored => continue,
        };
        for skill in scan_dictionary_skills(clause.text) {
            found
                .entry(skill)
                .and_modify(|existing| *existing = (*existing).min(importance))
                .or_insert(importance);
        }
    }

    let mut skills: Vec<SkillRequirement> = found
        .into_iter()
        .map(|(name, importance)| SkillRequirement { name, importance })
        .collect();
    skills.sort_by(|a, b| a.importance.cmp(&b.importance).then_with(|| a.name.cmp(&b.name)));
    skills
}

/// Largest "N years" figure, in months.
fn extract_min_experience(clauses: &[Clause<'_>]) -> u32 {
    let mut years = 0u32;
    for clause in clauses.iter().filter(|c| c.mode != Mode::Ignored) {
        let strict = YEARS_RE.captures_iter(clause.text);
        let loose = LOOSE_YEARS_RE
            .captures_iter(clause.text)
            .filter(|_| clause.mode == Mode::Required);
        for caps in strict.chain(loose) {
            if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                years = years.max(n);
            }
        }
    }
    years * 12
}

/// Lowest degree level named outside preferred and ignored clauses.
/// A bare "degree" reads as a bachelor's.
fn extract_education(clauses: &[Clause<'_>]) -> DegreeLevel {
    let relevant: Vec<&str> = clauses
        .iter()
        .filter(|c| matches!(c.mode, Mode::Required | Mode::Unmarked))
        .map(|c| c.text)
        .collect();

    let lowest = relevant
        .iter()
        .flat_map(|text| degree_levels_in(text))
        .min();
    match lowest {
        Some(level) => level,
        None if relevant.iter().any(|text| DEGREE_WORD_RE.is_match(text)) => DegreeLevel::Bachelor,
        None => DegreeLevel::None,
    }
}

fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let mut keywords = scan_dictionary_skills(text);
    keywords.extend(
        DOMAIN_TERMS
            .iter()
            .filter(|term| contains_term(&lower, term))
            .map(|term| term.to_string()),
    );
    keywords
}
