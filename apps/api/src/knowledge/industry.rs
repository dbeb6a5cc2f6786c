//! Industry patterns: score benchmarks, common and trending skills, detection vocabulary.

use serde::Serialize;

use crate::scoring::matching::contains_term;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndustryProfile {
    pub name: &'static str,
    pub average_score: f64,
    pub top_percentile: f64,
    pub common_skills: &'static [&'static str],
    pub trending_skills: &'static [&'static str],
    #[serde(skip)]
    vocabulary: &'static [&'static str],
}

pub const GENERAL: &str = "general";

const INDUSTRIES: &[IndustryProfile] = &[
    IndustryProfile {
        name: "technology",
        average_score: 75.0,
        top_percentile: 90.0,
        common_skills: &["Python", "JavaScript", "SQL", "Git", "AWS", "Docker"],
        trending_skills: &["Kubernetes", "Machine Learning", "Rust", "Terraform", "GraphQL"],
        vocabulary: &[
            "software", "engineer", "developer", "cloud", "saas", "platform", "api",
            "devops", "startup", "backend", "frontend",
        ],
    },
    IndustryProfile {
        name: "healthcare",
        average_score: 70.0,
        top_percentile: 85.0,
        common_skills: &["Excel", "SQL", "Data Science"],
        trending_skills: &["Machine Learning", "Python", "Tableau"],
        vocabulary: &[
            "patient", "clinical", "hospital", "hipaa", "healthcare", "medical", "nurse",
            "ehr", "pharmaceutical",
        ],
    },
    IndustryProfile {
        name: "finance",
        average_score: 78.0,
        top_percentile: 92.0,
        common_skills: &["Excel", "SQL", "Python"],
        trending_skills: &["Machine Learning", "Data Science", "Tableau"],
        vocabulary: &[
            "bank", "banking", "trading", "investment", "fintech", "financial", "risk",
            "portfolio", "compliance", "accounting",
        ],
    },
    IndustryProfile {
        name: "marketing",
        average_score: 72.0,
        top_percentile: 87.0,
        common_skills: &["Excel", "Tableau"],
        trending_skills: &["Data Science", "SQL", "Python"],
        vocabulary: &[
            "marketing", "brand", "campaign", "seo", "content", "social media", "advertising",
            "growth",
        ],
    },
    IndustryProfile {
        name: GENERAL,
        average_score: 70.0,
        top_percentile: 85.0,
        common_skills: &[],
        trending_skills: &[],
        vocabulary: &[],
    },
];

/// Profile for an industry name, falling back to `general` for unknown names.
pub fn industry_profile(industry: &str) -> &'static IndustryProfile {
    let wanted = industry.trim().to_lowercase();
    INDUSTRIES
        .iter()
        .find(|p| p.name == wanted)
        .unwrap_or(&INDUSTRIES[INDUSTRIES.len() - 1])
}

pub fn industries() -> &'static [IndustryProfile] {
    INDUSTRIES
}

/// Infers the industry from vocabulary hits. Needs at least two distinct hits;
/// ties go to the earlier industry in the table.
pub fn detect_industry(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    let mut best: Option<(&'static str, usize)> = None;

    for profile in INDUSTRIES {
        let hits = profile
            .vocabulary
            .iter()
            .filter(|term| contains_term(&lower, term))
            .count();
        if hits >= 2 && best.map_or(true, |(_, n)| hits > n) {
            best = Some((profile.name, hits));
        }
    }

    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_industry_benchmarks() {
        let finance = industry_profile("Finance");
        assert_eq!(finance.average_score, 78.0);
        assert_eq!(finance.top_percentile, 92.0);
    }

    #[test]
    fn test_unknown_industry_falls_back_to_general() {
        let profile = industry_profile("aerospace");
        assert_eq!(profile.name, "general");
        assert_eq!(profile.average_score, 70.0);
        assert_eq!(profile.top_percentile, 85.0);
    }

    #[test]
    fn test_detect_industry_technology() {
        let text = "Backend software engineer for our cloud platform team";
        assert_eq!(detect_industry(text), Some("technology"));
    }

    #[test]
    fn test_detect_industry_healthcare() {
        let text = "Analyst supporting clinical operations and patient outcomes at a hospital";
        assert_eq!(detect_industry(text), Some("healthcare"));
    }

    #[test]
    fn test_detect_industry_requires_two_hits() {
        assert_eq!(detect_industry("We value a strong brand."), None);
    }
}
