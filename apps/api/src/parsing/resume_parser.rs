//! Field Parser: raw résumé text → `ResumeRecord`.
//!
//! Rule-based and best-effort. A section that cannot be read yields an empty
//! collection; parsing itself never fails.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::knowledge::taxonomy::{canonical_name, scan_terms};
use crate::parsing::dates::find_date_range;
use crate::parsing::sections::{lines_of, split_sections, Section, SectionKind};
use crate::parsing::vocabulary::{
    detect_degree, DOMAIN_TERMS, EMAIL_RE, FIELD_IN_RE, FIELD_OF_RE, GITHUB_RE,
    INSTITUTION_MARKERS, LINKEDIN_RE, LOCATION_RE, PHONE_RE, TITLE_WORDS,
};
use crate::scoring::matching::contains_term;
use crate::scoring::models::{ContactInfo, EducationEntry, ExperienceEntry, ResumeRecord};

const BULLETS: &[char] = &['•', '-', '*', '▪', '◦', '‣', '●', '–', '·'];
const SKILL_DELIMITERS: &[char] = &[',', '•', '|', ';', '·'];
const MAX_SKILL_LEN: usize = 40;
const ROLE_SEPARATORS: &[&str] = &[" at ", " | ", " @ ", " - ", " – ", " — ", ", "];
const MAX_TITLE_WORDS: usize = 12;

/// Parsing strategy. Implement this to swap in a different extractor.
pub trait ResumeParser: Send + Sync {
    fn parse(&self, text: &str) -> ResumeRecord;
}

/// Regex and dictionary based parser.
///
/// Open date ranges ("Present") resolve against `reference_date`. A rolling
/// parser uses the current UTC date at each call.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedResumeParser {
    reference_date: Option<NaiveDate>,
}

impl RuleBasedResumeParser {
    /// Parser pinned to a fixed date, so the same text always yields the same record.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date: Some(reference_date),
        }
    }

    pub fn rolling() -> Self {
        Self::default()
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl ResumeParser for RuleBasedResumeParser {
    fn parse(&self, text: &str) -> ResumeRecord {
        let sections = split_sections(text);

        let contact = extract_contact(text, &sections);
        let skills = extract_skills(text, &sections);
        let experience = extract_experience(&lines_of(&sections, SectionKind::Experience), self.reference_date());
        let education = extract_education(&sections);
        let certifications = plain_items(&lines_of(&sections, SectionKind::Certifications));
        let projects = plain_items(&lines_of(&sections, SectionKind::Projects));
        let keywords = extract_keywords(text);

        debug!(
            skills = skills.len(),
            experience = experience.len(),
            education = education.len(),
            keywords = keywords.len(),
            "Parsed résumé"
        );

        ResumeRecord {
            contact,
            skills,
            experience,
            education,
            keywords,
            certifications,
            projects,
            raw_text: text.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

fn extract_contact(text: &str, sections: &[Section]) -> ContactInfo {
    let header = lines_of(sections, SectionKind::Header);
    let name = header.iter().take(5).find(|l| looks_like_name(l)).map(|l| l.to_string());

    let location = header
        .iter()
        .filter(|l| Some(l.to_string()) != name)
        .find_map(|l| LOCATION_RE.find(l))
        .map(|m| m.as_str().to_string());

    ContactInfo {
        name,
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(text).map(|m| m.as_str().trim().to_string()),
        linkedin: LINKEDIN_RE.find(text).map(|m| m.as_str().to_string()),
        github: GITHUB_RE.find(text).map(|m| m.as_str().to_string()),
        location,
    }
}

/// Two to four capitalised words, no digits or contact punctuation.
fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) || line.contains('@') || line.contains('|') {
        return false;
    }
    words.iter().all(|w| {
        w.chars().next().is_some_and(|c| c.is_uppercase())
            && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Skills and keywords
// ────────────────────────────────────────────────────────────────────────────

fn extract_skills(text: &str, sections: &[Section]) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    for line in lines_of(sections, SectionKind::Skills) {
        let line = strip_bullet(line);
        // "Languages: Python, Go" → drop the sub-label
        let line = line.split_once(':').map_or(line, |(_, rest)| rest);
        for item in line.split(SKILL_DELIMITERS) {
            let item = item.trim().trim_end_matches('.');
            if !item.is_empty() && item.len() <= MAX_SKILL_LEN {
                skills.insert(canonical_name(item));
            }
        }
    }

    skills.extend(scan_dictionary_skills(text));
    skills
}

/// Canonical names of every taxonomy term mentioned in the text.
pub fn scan_dictionary_skills(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    scan_terms()
        .iter()
        .filter(|(term, _)| contains_term(&lower, term))
        .map(|(_, canonical)| canonical.to_string())
        .collect()
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

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ExperienceDraft {
    role: String,
    company: Option<String>,
    months: u32,
    date_range: Option<String>,
    description: Vec<String>,
}

impl ExperienceDraft {
    fn finish(self) -> Option<ExperienceEntry> {
        if self.role.is_empty() {
            return None;
        }
        Some(ExperienceEntry {
            role: self.role,
            company: self.company,
            duration_months: self.months,
            description: self.description.join("\n"),
            date_range: self.date_range,
        })
    }
}

fn extract_experience(lines: &[&str], reference: NaiveDate) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut current: Option<ExperienceDraft> = None;

    for line in lines {
        if is_bullet(line) {
            if let Some(draft) = current.as_mut() {
                draft.description.push(strip_bullet(line).to_string());
            }
            continue;
        }

        let range = find_date_range(line, reference);
        let remainder = match &range {
            Some(r) => line.replace(&r.raw, " "),
            None => line.to_string(),
        };
        let remainder = remainder.trim().trim_matches(|c: char| c == '|' || c == ',' || c == '-' || c == '(' || c == ')').trim();

        // A date line directly under a title belongs to that title.
        if let (Some(range), Some(draft)) = (&range, current.as_mut()) {
            if draft.date_range.is_none() && draft.description.is_empty() {
                draft.months = range.months;
                draft.date_range = Some(range.raw.clone());
                if draft.company.is_none() && !remainder.is_empty() {
                    draft.company = Some(remainder.to_string());
                }
                continue;
            }
        }

        if range.is_some() || is_title_line(remainder) {
            if let Some(done) = current.take().and_then(ExperienceDraft::finish) {
                entries.push(done);
            }
            let (role, company) = split_role_company(remainder);
            current = Some(ExperienceDraft {
                role,
                company,
                months: range.as_ref().map_or(0, |r| r.months),
                date_range: range.map(|r| r.raw),
                description: Vec::new(),
            });
            continue;
        }

        if let Some(draft) = current.as_mut() {
            if draft.company.is_none() && draft.description.is_empty() {
                draft.company = Some(remainder.to_string());
            } else {
                draft.description.push(remainder.to_string());
            }
        }
    }

    if let Some(done) = current.and_then(ExperienceDraft::finish) {
        entries.push(done);
    }
    entries
}

fn is_title_line(line: &str) -> bool {
    let word_count = line.split_whitespace().count();
    if word_count == 0 || word_count > MAX_TITLE_WORDS {
        return false;
    }
    let lower = line.to_lowercase();
    TITLE_WORDS.iter().any(|w| contains_term(&lower, w))
        || lower.contains(" at ")
        || lower.contains(" | ")
}

fn split_role_company(line: &str) -> (String, Option<String>) {
    for sep in ROLE_SEPARATORS {
        if let Some((role, rest)) = line.split_once(sep) {
            let company = ROLE_SEPARATORS
                .iter()
                .fold(rest, |acc, s| acc.split(s).next().unwrap_or(acc))
                .trim();
            let company = (!company.is_empty()).then(|| company.to_string());
            return (role.trim().to_string(), company);
        }
    }
    (line.trim().to_string(), None)
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

fn extract_education(sections: &[Section]) -> Vec<EducationEntry> {
    let mut lines = lines_of(sections, SectionKind::Education);
    if lines.is_empty() {
        // No heading: fall back to any line naming a degree.
        lines = sections
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
            .filter(|l| detect_degree(l).is_some())
            .collect();
    }

    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut pending_institution: Option<String> = None;

    for line in lines {
        let line = strip_bullet(line);
        let institution = institution_in(line);

        if let Some(degree) = detect_degree(line) {
            entries.push(EducationEntry {
                degree,
                field: field_of_study(line),
                institution: institution.or_else(|| pending_institution.take()),
                raw: line.to_string(),
            });
        } else if let Some(inst) = institution {
            match entries.last_mut() {
                Some(last) if last.institution.is_none() => last.institution = Some(inst),
                _ => pending_institution = Some(inst),
            }
        }
    }

    if let Some(inst) = pending_institution {
        entries.push(EducationEntry {
            degree: Default::default(),
            field: None,
            institution: Some(inst.clone()),
            raw: inst,
        });
    }
    entries
}

fn institution_in(line: &str) -> Option<String> {
    line.split([',', '|', '–', '—', '(', ')'])
        .flat_map(|part| part.split(" - "))
        .map(str::trim)
        .find(|part| {
            let lower = part.to_lowercase();
            INSTITUTION_MARKERS.iter().any(|m| contains_term(&lower, m))
        })
        .map(str::to_string)
}

/// Text after the last " in " (or first " of ") up to the next separator.
fn field_of_study(line: &str) -> Option<String> {
    let start = FIELD_IN_RE
        .find_iter(line)
        .last()
        .or_else(|| FIELD_OF_RE.find(line))?
        .end();
    let field = line[start..]
        .split([',', '|', '(', '–', '—', ';'])
        .next()?
        .split(" - ")
        .next()?
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_digit() || c.is_whitespace());
    let words: Vec<&str> = field.split_whitespace().take(5).collect();
    (!words.is_empty()).then(|| words.join(" "))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLETS)
}

fn strip_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(BULLETS).trim()
}

fn plain_items(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|l| strip_bullet(l))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Quick completeness check of a parsed record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionQuality {
    pub completeness: f64,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

const QUALITY_CHECKS: &[(&str, f64)] = &[
    ("contact", 0.25),
    ("experience", 0.30),
    ("education", 0.20),
    ("skills", 0.25),
];

/// Scores how much of the résumé the parser could recover, with fix-up hints.
pub fn assess_extraction(record: &ResumeRecord) -> ExtractionQuality {
    let mut completeness = 0.0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    for (check, weight) in QUALITY_CHECKS {
        let present = match *check {
            "contact" => record.contact.email.is_some() || record.contact.phone.is_some(),
            "experience" => !record.experience.is_empty(),
            "education" => !record.education.is_empty(),
            _ => !record.skills.is_empty(),
        };
        if present {
            completeness += weight;
            continue;
        }
        let (issue, recommendation) = match *check {
            "contact" => (
                "No email or phone number found",
                "Add an email address and phone number near the top of the résumé",
            ),
            "experience" => (
                "No work experience entries found",
                "Use a clear 'Experience' heading with one title line per role",
            ),
            "education" => (
                "No education entries found",
                "Add an 'Education' section listing degree and institution",
            ),
            _ => (
                "No skills found",
                "Add a 'Skills' section with comma-separated skills",
            ),
        };
        issues.push(issue.to_string());
        recommendations.push(recommendation.to_string());
    }

    ExtractionQuality {
        completeness: (completeness * 100.0_f64).round() / 100.0,
        issues,
        recommendations,
    }
}
