//! Shared regexes and keyword dictionaries for the rule-based parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scoring::models::DegreeLevel;

pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.\-]?)?\(?\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}").unwrap()
});

pub static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_\-]+/?").unwrap());

pub static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_\-]+/?").unwrap());

/// "City, ST" or "City, Country".
pub static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*),\s*([A-Z]{2}|[A-Z][a-z]+)\b").unwrap()
});

/// " in " / " of " before a field of study ("Bachelor in Economics", "Master of Science").
pub static FIELD_IN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) in ").unwrap());
pub static FIELD_OF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) of ").unwrap());

/// "5+ years of experience", "3 yrs exp".
pub static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:years?|yrs?)\s*(?:of\s+)?(?:[a-z/\-]+\s+){0,3}?(?:experience|exp)\b").unwrap()
});

static DEGREE_PATTERNS: Lazy<Vec<(DegreeLevel, Regex)>> = Lazy::new(|| {
    vec![
        (
            DegreeLevel::Doctorate,
            Regex::new(r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral|doctor of)\b").unwrap(),
        ),
        (
            DegreeLevel::Master,
            Regex::new(r"(?i)\b(?:master(?:'|’)s|masters\b|master\s+(?:of|in|degree)|mba|m\.b\.a|msc|m\.sc|m\.s\.|m\.eng|meng|m\.a\.)").unwrap(),
        ),
        (
            DegreeLevel::Bachelor,
            Regex::new(r"(?i)\b(?:bachelor(?:'|’)?s?|b\.s\.|bs\s+in|bsc|b\.sc|b\.a\.|ba\s+in|b\.tech|btech|b\.eng|beng|b\.e\.|undergraduate degree)").unwrap(),
        ),
        (
            DegreeLevel::Associate,
            Regex::new(r"(?i)\b(?:associate'?s?\s+degree|associate\s+of|a\.a\.s?|a\.s\.|aas\b)").unwrap(),
        ),
    ]
});

/// Every degree level mentioned in `text`, highest first.
pub fn degree_levels_in(text: &str) -> Vec<DegreeLevel> {
    DEGREE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .collect()
}

/// Highest degree level mentioned in `text`.
pub fn detect_degree(text: &str) -> Option<DegreeLevel> {
    degree_levels_in(text).into_iter().max()
}

pub const INSTITUTION_MARKERS: &[&str] = &["university", "college", "institute", "school", "academy"];

/// Words that mark a line as a job title (with " at ", " | ", " - " separators as a fallback).
pub const TITLE_WORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "specialist",
    "coordinator",
    "director",
    "consultant",
    "scientist",
    "designer",
    "architect",
    "intern",
    "lead",
    "administrator",
    "associate",
    "officer",
];

/// Non-skill terms worth tracking as keywords in postings and résumés.
pub const DOMAIN_TERMS: &[&str] = &[
    "api",
    "apis",
    "architecture",
    "automation",
    "backend",
    "cloud",
    "data pipelines",
    "distributed systems",
    "frontend",
    "full stack",
    "infrastructure",
    "microservices",
    "mobile",
    "monitoring",
    "performance",
    "product",
    "reliability",
    "scalability",
    "security",
    "testing",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_and_phone() {
        let text = "Jane Doe | jane.doe@example.com | (555) 123-4567";
        assert_eq!(EMAIL_RE.find(text).map(|m| m.as_str()), Some("jane.doe@example.com"));
        assert_eq!(PHONE_RE.find(text).map(|m| m.as_str()), Some("(555) 123-4567"));
    }

    #[test]
    fn test_profile_links() {
        let text = "linkedin.com/in/jane-doe github.com/janedoe";
        assert_eq!(LINKEDIN_RE.find(text).map(|m| m.as_str()), Some("linkedin.com/in/jane-doe"));
        assert_eq!(GITHUB_RE.find(text).map(|m| m.as_str()), Some("github.com/janedoe"));
    }

    #[test]
    fn test_years_of_experience() {
        let caps = YEARS_RE.captures("Requires 5+ years of professional experience").unwrap();
        assert_eq!(&caps[1], "5");
        assert!(YEARS_RE.is_match("3 yrs exp"));
        assert!(!YEARS_RE.is_match("founded 10 years ago"));
    }

    #[test]
    fn test_detect_degree_levels() {
        assert_eq!(detect_degree("Ph.D. in Physics"), Some(DegreeLevel::Doctorate));
        assert_eq!(detect_degree("Master of Science, Data Science"), Some(DegreeLevel::Master));
        assert_eq!(detect_degree("MBA, Wharton"), Some(DegreeLevel::Master));
        assert_eq!(detect_degree("B.S. in Computer Science"), Some(DegreeLevel::Bachelor));
        assert_eq!(detect_degree("Bachelor's degree"), Some(DegreeLevel::Bachelor));
        assert_eq!(detect_degree("Associate of Applied Science"), Some(DegreeLevel::Associate));
        assert_eq!(detect_degree("Associate Engineer"), None);
        assert_eq!(detect_degree("High school diploma"), None);
        assert_eq!(detect_degree("Certified Scrum Master"), None);
    }

    #[test]
    fn test_degree_levels_in_lists_all() {
        let levels = degree_levels_in("Bachelor's required; Master's preferred");
        assert_eq!(levels, vec![DegreeLevel::Master, DegreeLevel::Bachelor]);
    }
}
