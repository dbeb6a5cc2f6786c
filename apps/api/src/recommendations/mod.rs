//! Recommendation Generator: turns a score report into prioritized, concrete
//! improvement suggestions. Rule lookup only; no I/O.

pub mod bullets;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::knowledge::taxonomy::{analyze_skill_gaps, SkillSuggestion};
use crate::parsing::dates::uses_numeric_dates;
use crate::recommendations::bullets::review_description;
use crate::scoring::models::{Category, JobRequirement, ResumeRecord};
use crate::scoring::report::ScoreReport;

const WEAK_AREA_THRESHOLD: f64 = 70.0;
const PRIORITY_THRESHOLD: f64 = 60.0;
const REVIEW_THRESHOLD: f64 = 60.0;
const MIN_BULLETS_PER_ROLE: usize = 3;
const MIN_SKILLS: usize = 5;
const MAX_MISSING_KEYWORDS: usize = 10;

static STRICT_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAction {
    pub priority: u8,
    pub category: String,
    pub action: String,
    pub description: String,
    pub impact: Level,
    pub effort: Level,
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickWin {
    pub action: String,
    pub description: String,
    pub time_required: String,
    pub impact: Level,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentImprovements {
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAdvice {
    pub missing_keywords: Vec<String>,
    pub placement: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillDevelopment {
    /// Missing required skills, most urgent first.
    pub immediate: Vec<String>,
    pub long_term: Vec<String>,
    /// Missing skills with a related skill the candidate already has.
    pub bridges: Vec<SkillSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub weakest_areas: Vec<Category>,
    pub priority_actions: Vec<PriorityAction>,
    pub quick_wins: Vec<QuickWin>,
    pub category_advice: Vec<String>,
    pub content_improvements: ContentImprovements,
    pub keyword_optimization: KeywordAdvice,
    pub skill_development: SkillDevelopment,
    pub experience_strategy: Vec<String>,
    pub industry_positioning: Vec<String>,
    /// Estimated points each category could still gain.
    pub improvement_potential: BTreeMap<Category, u32>,
}

pub fn generate(report: &ScoreReport, resume: &ResumeRecord, job: &JobRequirement) -> Recommendations {
    Recommendations {
        weakest_areas: weakest_areas(report),
        priority_actions: priority_actions(report, resume),
        quick_wins: quick_wins(resume),
        category_advice: category_advice(report),
        content_improvements: content_improvements(report, resume),
        keyword_optimization: keyword_advice(report),
        skill_development: skill_development(report, resume, job),
        experience_strategy: experience_strategy(resume.total_experience_months()),
        industry_positioning: industry_positioning(&report.benchmark.industry),
        improvement_potential: report
            .breakdown
            .sub_scores()
            .into_iter()
            .map(|(c, s)| (c, improvement_potential(s)))
            .collect(),
    }
}

/// Categories under 70, lowest first. Ties keep category order.
pub fn weakest_areas(report: &ScoreReport) -> Vec<Category> {
    let mut weak: Vec<(Category, f64)> = report
        .breakdown
        .sub_scores()
        .into_iter()
        .filter(|(_, s)| *s < WEAK_AREA_THRESHOLD)
        .collect();
    weak.sort_by(|a, b| a.1.total_cmp(&b.1));
    weak.into_iter().map(|(c, _)| c).collect()
}

pub fn improvement_potential(score: f64) -> u32 {
    if score < 50.0 {
        30
    } else if score < 70.0 {
        20
    } else if score < 85.0 {
        10
    } else {
        5
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Priority actions
// ────────────────────────────────────────────────────────────────────────────

fn priority_actions(report: &ScoreReport, resume: &ResumeRecord) -> Vec<PriorityAction> {
    let mut actions = Vec::new();

    let lowest = report
        .breakdown
        .sub_scores()
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((category, score)) = lowest {
        if score < PRIORITY_THRESHOLD {
            actions.push(category_action(category));
        }
    }

    if resume.contact.linkedin.is_none() {
        actions.push(PriorityAction {
            priority: 2,
            category: "Contact Information".to_string(),
            action: "Add LinkedIn profile".to_string(),
            description: "Include your LinkedIn profile URL in the contact section.".to_string(),
            impact: Level::Medium,
            effort: Level::Low,
            timeline: "15 minutes".to_string(),
        });
    }

    let missing = &report.details.missing_required_skills;
    if !missing.is_empty() {
        let top: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();
        actions.push(PriorityAction {
            priority: 3,
            category: "Job Targeting".to_string(),
            action: format!("Add job-specific skills: {}", top.join(", ")),
            description: "Include skills named in the job description to improve the match rate."
                .to_string(),
            impact: Level::High,
            effort: Level::Low,
            timeline: "30 minutes".to_string(),
        });
    }

    actions
}

fn category_action(category: Category) -> PriorityAction {
    let (area, action, description, impact, effort, timeline) = match category {
        Category::TechnicalSkills => (
            "Skills Enhancement",
            "Add missing technical skills",
            "Your skills section needs immediate attention. Add 3-5 relevant technical skills that match the job requirements.",
            Level::High,
            Level::Low,
            "1-2 hours",
        ),
        Category::SoftSkills => (
            "Soft Skills",
            "Show soft skills through results",
            "Name the communication, leadership and teamwork behind your achievements instead of listing them bare.",
            Level::Medium,
            Level::Low,
            "1 hour",
        ),
        Category::Experience => (
            "Experience Enhancement",
            "Quantify achievements",
            "Add numbers, percentages or metrics to your accomplishments. Use action verbs and specific results.",
            Level::High,
            Level::Medium,
            "3-4 hours",
        ),
        Category::Education => (
            "Education",
            "Add relevant certifications or training",
            "Close the education gap with certifications, courses or equivalent experience stated explicitly.",
            Level::Medium,
            Level::High,
            "weeks to months",
        ),
        Category::Keywords => (
            "Keyword Optimization",
            "Mirror the job description's keywords",
            "Work the posting's key terms into your summary, skills and experience where they are true.",
            Level::High,
            Level::Low,
            "1 hour",
        ),
    };

    PriorityAction {
        priority: 1,
        category: area.to_string(),
        action: action.to_string(),
        description: description.to_string(),
        impact,
        effort,
        timeline: timeline.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quick wins and advice
// ────────────────────────────────────────────────────────────────────────────

fn quick_wins(resume: &ResumeRecord) -> Vec<QuickWin> {
    let mut wins = Vec::new();
    let mut push = |action: &str, description: &str, time: &str, impact: Level| {
        wins.push(QuickWin {
            action: action.to_string(),
            description: description.to_string(),
            time_required: time.to_string(),
            impact,
        })
    };

    if resume.contact.linkedin.is_none() {
        push(
            "Add LinkedIn Profile",
            "Include your LinkedIn URL in the contact section",
            "2 minutes",
            Level::Medium,
        );
    }

    let lowercase_skill = resume
        .skills
        .iter()
        .any(|s| s.chars().any(char::is_alphabetic) && *s == s.to_lowercase());
    if lowercase_skill {
        push(
            "Capitalize Skill Names",
            "Write skill names the way vendors do (e.g., 'Python' not 'python')",
            "5 minutes",
            Level::Low,
        );
    }

    let inconsistent_dates = resume
        .experience
        .iter()
        .filter_map(|e| e.date_range.as_deref())
        .any(|range| !uses_numeric_dates(range));
    if inconsistent_dates {
        push(
            "Standardize Date Format",
            "Use MM/YYYY format consistently for all dates",
            "5 minutes",
            Level::Medium,
        );
    }

    if let Some(email) = &resume.contact.email {
        if !STRICT_EMAIL_RE.is_match(email.trim()) {
            push(
                "Fix Email Format",
                "Make sure the email address is correctly formatted",
                "1 minute",
                Level::High,
            );
        }
    }

    wins
}

fn category_advice(report: &ScoreReport) -> Vec<String> {
    let b = &report.breakdown;
    let mut advice = Vec::new();

    if b.technical_skills < 70.0 {
        advice.push("Add more relevant technical skills matching the job requirements");
    }
    if b.soft_skills < 70.0 {
        advice.push("Describe soft skills with concrete examples of collaboration and leadership");
    }
    if b.experience < 70.0 {
        advice.push("Include more quantified achievements in your work experience");
        advice.push("Start bullets with action verbs and specific accomplishments");
    }
    if b.education < 60.0 {
        advice.push("Consider adding relevant certifications or training");
    }
    if b.keywords < 70.0 {
        advice.push("Include more industry-relevant keywords");
        advice.push("Optimize for ATS keyword scanning");
    }

    let scores = b.sub_scores();
    let average = scores.iter().map(|(_, s)| s).sum::<f64>() / scores.len() as f64;
    if average < REVIEW_THRESHOLD {
        advice.push("Consider a professional résumé review and rewrite");
    }

    advice.into_iter().map(str::to_string).collect()
}

fn content_improvements(report: &ScoreReport, resume: &ResumeRecord) -> ContentImprovements {
    let mut out = ContentImprovements::default();

    if resume.experience.len() < 2 {
        out.experience
            .push("Include more work experience entries (internships and projects count)".to_string());
    }

    let mut weak_phrase_seen = false;
    let mut vague_word = None;
    let (mut strong, mut bullets) = (0, 0);
    for entry in &resume.experience {
        let reviews = review_description(&entry.description);
        if reviews.len() < MIN_BULLETS_PER_ROLE {
            out.experience.push(format!(
                "Add more detail for the {} role (aim for 3-5 bullet points)",
                entry.role
            ));
        }
        if !reviews.iter().any(|r| r.quantified) {
            out.experience.push(format!(
                "Add quantified achievements for the {} role with specific metrics",
                entry.role
            ));
        }
        weak_phrase_seen |= reviews.iter().any(|r| r.weak_phrase.is_some());
        if vague_word.is_none() {
            vague_word = reviews.iter().find_map(|r| r.vague_scale.clone());
        }
        strong += reviews.iter().filter(|r| r.is_strong()).count();
        bullets += reviews.len();
    }
    if weak_phrase_seen {
        out.experience.push(
            "Replace weak phrases like 'responsible for' with action verbs like 'led', 'built', 'shipped'"
                .to_string(),
        );
    }
    if let Some(word) = vague_word {
        out.experience.push(format!(
            "Replace vague words like '{word}' with concrete numbers"
        ));
    }
    if bullets > 0 && strong * 2 < bullets {
        out.experience.push(format!(
            "Only {strong} of {bullets} bullets pair an action verb with a measurable result"
        ));
    }

    if resume.skills.is_empty() {
        out.skills.push("Add a skills section listing your technical skills".to_string());
    } else if resume.skills.len() < MIN_SKILLS {
        out.skills
            .push("Expand the skills section (aim for 8-12 relevant skills)".to_string());
    }
    if resume.certifications.is_empty() {
        out.skills
            .push("Add relevant certifications or professional qualifications".to_string());
    }

    if resume.education.is_empty() {
        out.education
            .push("Add education information (degree, institution, graduation year)".to_string());
    }
    let details = &report.details;
    if details.candidate_degree < details.required_degree {
        out.education.push(format!(
            "The role asks for a {} degree and yours reads as {}; list equivalent experience or coursework",
            details.required_degree, details.candidate_degree
        ));
    }

    out
}

fn keyword_advice(report: &ScoreReport) -> KeywordAdvice {
    let missing: Vec<String> = report
        .details
        .missing_keywords
        .iter()
        .take(MAX_MISSING_KEYWORDS)
        .cloned()
        .collect();
    let placement = if missing.is_empty() {
        Vec::new()
    } else {
        vec![
            "Integrate missing keywords naturally into your experience descriptions".to_string(),
            "Add relevant keywords to your skills section".to_string(),
            "Include keywords in your professional summary".to_string(),
        ]
    };
    KeywordAdvice {
        missing_keywords: missing,
        placement,
    }
}

fn skill_development(report: &ScoreReport, resume: &ResumeRecord, job: &JobRequirement) -> SkillDevelopment {
    let details = &report.details;
    let gaps = analyze_skill_gaps(&resume.skills, job.required_skills().chain(job.preferred_skills()));

    SkillDevelopment {
        immediate: details
            .missing_required_skills
            .iter()
            .take(3)
            .map(|s| format!("Priority skill to develop: {s}"))
            .collect(),
        long_term: details
            .missing_preferred_skills
            .iter()
            .take(5)
            .map(|s| format!("Consider learning {s} for a competitive edge"))
            .collect(),
        bridges: gaps.suggestions,
    }
}

/// Advice keyed on total experience: under 2 years, under 5, or more.
pub fn experience_strategy(total_months: u32) -> Vec<String> {
    let years = total_months as f64 / 12.0;
    let lines: &[&str] = if years < 2.0 {
        &[
            "Focus on building foundational experience in core technologies",
            "Seek mentorship from senior colleagues",
            "Contribute to open-source projects to build a portfolio",
            "Consider internships or entry-level positions for experience",
        ]
    } else if years < 5.0 {
        &[
            "Take on leadership roles in projects",
            "Develop expertise in a specific technology domain",
            "Start mentoring junior team members",
            "Pursue complex technical challenges",
        ]
    } else {
        &[
            "Focus on strategic technical leadership",
            "Drive architectural decisions and technology adoption",
            "Build cross-functional collaboration skills",
            "Consider management or technical lead opportunities",
        ]
    };
    lines.iter().map(|l| l.to_string()).collect()
}

fn industry_positioning(industry: &str) -> Vec<String> {
    let lines: &[&str] = match industry {
        "technology" => &[
            "Stay current with emerging technology trends",
            "Build expertise in cloud technologies and DevOps",
            "Focus on scalable system design and architecture",
        ],
        "finance" => &[
            "Understand the financial domain and its regulatory requirements",
            "Develop expertise in security and compliance",
            "Focus on high-performance, reliable systems",
        ],
        "healthcare" => &[
            "Learn healthcare data standards and privacy rules such as HIPAA",
            "Highlight work on reliability and patient-facing outcomes",
        ],
        "marketing" => &[
            "Show campaign results with conversion and growth metrics",
            "Build fluency with analytics and reporting tools",
        ],
        _ => &[],
    };
    lines.iter().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::models::{ContactInfo, DegreeLevel, ExperienceEntry, SkillRequirement};
    use crate::scoring::report::build_report;
    use crate::scoring::scorer::WeightedScorer;

    fn entry(role: &str, months: u32, description: &str, range: Option<&str>) -> ExperienceEntry {
        ExperienceEntry {
            role: role.to_string(),
            company: None,
            duration_months: months,
            description: description.to_string(),
            date_range: range.map(str::to_string),
        }
    }

    fn weak_resume() -> ResumeRecord {
        ResumeRecord {
            contact: ContactInfo {
                email: Some("jane at example".to_string()),
                ..Default::default()
            },
            skills: ["python".to_string()].into_iter().collect(),
            experience: vec![entry("Developer", 12, "Worked on web apps", Some("Jan 2022 - Jan 2023"))],
            raw_text: "python developer".to_string(),
            ..Default::default()
        }
    }

    fn job() -> JobRequirement {
        JobRequirement {
            skills: vec![
                SkillRequirement::required("Python"),
                SkillRequirement::required("Django"),
                SkillRequirement::required("AWS"),
                SkillRequirement::required("Docker"),
                SkillRequirement::preferred("Flask"),
            ],
            min_experience_months: 48,
            industry: Some("technology".to_string()),
            keywords: ["Python", "Django", "microservices"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn recommendations_for(resume: &ResumeRecord, job: &JobRequirement) -> (ScoreReport, Recommendations) {
        let report = build_report(&WeightedScorer::default(), resume, job, None).unwrap();
        let recs = generate(&report, resume, job);
        (report, recs)
    }

    #[test]
    fn test_improvement_potential_table() {
        assert_eq!(improvement_potential(10.0), 30);
        assert_eq!(improvement_potential(50.0), 20);
        assert_eq!(improvement_potential(69.9), 20);
        assert_eq!(improvement_potential(70.0), 10);
        assert_eq!(improvement_potential(85.0), 5);
    }

    #[test]
    fn test_weakest_areas_sorted_ascending() {
        let (report, recs) = recommendations_for(&weak_resume(), &job());
        let scores: Vec<f64> = recs.weakest_areas.iter().map(|c| report.breakdown.get(*c)).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert!(scores.iter().all(|s| *s < 70.0));
        assert!(!recs.weakest_areas.contains(&Category::Education));
    }

    #[test]
    fn test_priority_actions_for_weak_resume() {
        let (_, recs) = recommendations_for(&weak_resume(), &job());
        let priorities: Vec<u8> = recs.priority_actions.iter().map(|a| a.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);

        let targeting = &recs.priority_actions[2];
        assert_eq!(targeting.action, "Add job-specific skills: Django, AWS, Docker");
        assert_eq!(targeting.impact, Level::High);
    }

    #[test]
    fn test_quick_wins_for_weak_resume() {
        let (_, recs) = recommendations_for(&weak_resume(), &job());
        let actions: Vec<&str> = recs.quick_wins.iter().map(|w| w.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Add LinkedIn Profile",
                "Capitalize Skill Names",
                "Standardize Date Format",
                "Fix Email Format"
            ]
        );
    }

    #[test]
    fn test_numeric_dates_and_linkedin_need_no_quick_win() {
        let mut resume = weak_resume();
        resume.contact.linkedin = Some("linkedin.com/in/jane".to_string());
        resume.contact.email = Some("jane@example.com".to_string());
        resume.skills = ["Python".to_string()].into_iter().collect();
        resume.experience[0].date_range = Some("01/2022 - 01/2023".to_string());

        let (_, recs) = recommendations_for(&resume, &job());
        assert!(recs.quick_wins.is_empty());
        assert!(recs.priority_actions.iter().all(|a| a.category != "Contact Information"));
    }

    #[test]
    fn test_category_advice_includes_professional_review() {
        let (_, recs) = recommendations_for(&weak_resume(), &job());
        assert!(recs
            .category_advice
            .iter()
            .any(|a| a.contains("professional résumé review")));
    }

    #[test]
    fn test_content_improvements_flag_unquantified_roles() {
        let (_, recs) = recommendations_for(&weak_resume(), &job());
        let experience = &recs.content_improvements.experience;
        assert!(experience.iter().any(|l| l.contains("quantified achievements for the Developer role")));
        assert!(experience.iter().any(|l| l.contains("weak phrases")));
        assert!(experience.iter().any(|l| l.starts_with("Only 0 of 1 bullets")));
        assert!(!recs.content_improvements.education.is_empty());
    }

    #[test]
    fn test_degree_gap_is_explained() {
        let mut job = job();
        job.education = DegreeLevel::Master;
        let (_, recs) = recommendations_for(&weak_resume(), &job);
        assert!(recs
            .content_improvements
            .education
            .iter()
            .any(|l| l.contains("asks for a master degree and yours reads as none")));
    }

    #[test]
    fn test_skill_development_lists_missing_skills() {
        let (_, recs) = recommendations_for(&weak_resume(), &job());
        assert_eq!(recs.skill_development.immediate.len(), 3);
        assert_eq!(
            recs.skill_development.long_term,
            vec!["Consider learning Flask for a competitive edge"]
        );
        // Django and Flask both relate to Python, which the candidate has
        assert!(recs
            .skill_development
            .bridges
            .iter()
            .any(|b| b.missing_skill == "Django" && b.related_you_have == vec!["Python"]));
    }

    #[test]
    fn test_experience_strategy_bands() {
        assert!(experience_strategy(12)[0].contains("foundational"));
        assert!(experience_strategy(36)[0].contains("leadership roles"));
        assert!(experience_strategy(120)[0].contains("strategic"));
    }

    #[test]
    fn test_improvement_potential_covers_every_category() {
        let (_, recs) = recommendations_for(&weak_resume(), &job());
        assert_eq!(recs.improvement_potential.len(), 5);
        assert!(!recs.industry_positioning.is_empty());
    }
}
