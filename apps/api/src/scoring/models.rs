//! Parsed candidate and role records consumed by the scorer.
//!
//! Both records are produced once by the parsers and never mutated afterwards.
//! Collections are `BTreeSet`/`Vec` so that serialization order, and therefore
//! the consistency hash, is stable across runs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Degree levels
// ────────────────────────────────────────────────────────────────────────────

/// Totally ordered education level: none < associate < bachelor < master < doctorate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    #[default]
    None,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Ordinal position in the ladder, used for "levels below" comparisons.
    pub fn rank(self) -> i32 {
        match self {
            DegreeLevel::None => 0,
            DegreeLevel::Associate => 1,
            DegreeLevel::Bachelor => 2,
            DegreeLevel::Master => 3,
            DegreeLevel::Doctorate => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DegreeLevel::None => "none",
            DegreeLevel::Associate => "associate",
            DegreeLevel::Bachelor => "bachelor",
            DegreeLevel::Master => "master",
            DegreeLevel::Doctorate => "doctorate",
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate side
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
    pub duration_months: u32,
    #[serde(default)]
    pub description: String,
    /// Raw date range as written on the résumé, e.g. "Jan 2020 - Present".
    #[serde(default)]
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: DegreeLevel,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    /// Line the entry was parsed from.
    #[serde(default)]
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub raw_text: String,
}

impl ResumeRecord {
    /// Highest degree across all education entries (`None` when empty).
    pub fn highest_degree(&self) -> DegreeLevel {
        self.education
            .iter()
            .map(|e| e.degree)
            .max()
            .unwrap_or_default()
    }

    pub fn total_experience_months(&self) -> u32 {
        self.experience.iter().map(|e| e.duration_months).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Role side
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillImportance {
    Required,
    Preferred,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    pub importance: SkillImportance,
}

impl SkillRequirement {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            importance: SkillImportance::Required,
        }
    }

    pub fn preferred(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            importance: SkillImportance::Preferred,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub min_experience_months: u32,
    #[serde(default)]
    pub education: DegreeLevel,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
}

impl JobRequirement {
    pub fn required_skills(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .filter(|s| s.importance == SkillImportance::Required)
            .map(|s| s.name.as_str())
    }

    pub fn preferred_skills(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .filter(|s| s.importance == SkillImportance::Preferred)
            .map(|s| s.name.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

/// The five weighted scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TechnicalSkills,
    SoftSkills,
    Experience,
    Education,
    Keywords,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TechnicalSkills,
        Category::SoftSkills,
        Category::Experience,
        Category::Education,
        Category::Keywords,
    ];

    /// Serialized name, also the key inside stored category-score JSON.
    pub fn key(self) -> &'static str {
        match self {
            Category::TechnicalSkills => "technical_skills",
            Category::SoftSkills => "soft_skills",
            Category::Experience => "experience",
            Category::Education => "education",
            Category::Keywords => "keywords",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::TechnicalSkills => "Technical Skills",
            Category::SoftSkills => "Soft Skills",
            Category::Experience => "Experience",
            Category::Education => "Education",
            Category::Keywords => "Keywords",
        }
    }
}

/// Per-category sub-scores plus the weighted total, all in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub technical_skills: f64,
    pub soft_skills: f64,
    pub experience: f64,
    pub education: f64,
    pub keywords: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::TechnicalSkills => self.technical_skills,
            Category::SoftSkills => self.soft_skills,
            Category::Experience => self.experience,
            Category::Education => self.education,
            Category::Keywords => self.keywords,
        }
    }

    pub fn sub_scores(&self) -> [(Category, f64); 5] {
        Category::ALL.map(|c| (c, self.get(c)))
    }
}
