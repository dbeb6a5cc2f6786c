//! Static skill taxonomy: canonical names, categories, aliases and related skills.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillInfo {
    pub name: &'static str,
    pub category: &'static str,
    pub subcategory: &'static str,
    pub aliases: &'static [&'static str],
    pub related: &'static [&'static str],
    pub difficulty: Difficulty,
}

const fn skill(
    name: &'static str,
    category: &'static str,
    subcategory: &'static str,
    aliases: &'static [&'static str],
    related: &'static [&'static str],
    difficulty: Difficulty,
) -> SkillInfo {
    SkillInfo {
        name,
        category,
        subcategory,
        aliases,
        related,
        difficulty,
    }
}

use Difficulty::*;

pub const SKILLS: &[SkillInfo] = &[
    // Programming languages
    skill("Python", "Programming Languages", "Backend", &["python3", "py"], &["Django", "Flask", "Pandas", "Machine Learning"], Intermediate),
    skill("Java", "Programming Languages", "Backend", &["java8", "java 11", "jvm"], &["Spring Boot", "Kotlin", "Scala"], Intermediate),
    skill("JavaScript", "Programming Languages", "Frontend", &["js", "es6", "ecmascript"], &["TypeScript", "React", "Node.js"], Intermediate),
    skill("TypeScript", "Programming Languages", "Frontend", &["ts"], &["JavaScript", "React", "Angular"], Intermediate),
    skill("C++", "Programming Languages", "Systems", &["cpp", "c plus plus"], &["C", "Rust"], Advanced),
    skill("C", "Programming Languages", "Systems", &[], &["C++", "Linux"], Advanced),
    skill("C#", "Programming Languages", "Backend", &["csharp", "c sharp", ".net", "dotnet"], &["Azure", "Java"], Intermediate),
    skill("Go", "Programming Languages", "Backend", &["golang"], &["Kubernetes", "Docker", "Rust"], Intermediate),
    skill("Rust", "Programming Languages", "Systems", &["rustlang"], &["C++", "Go"], Advanced),
    skill("Ruby", "Programming Languages", "Backend", &["ruby on rails", "rails"], &["Python"], Intermediate),
    skill("PHP", "Programming Languages", "Backend", &["laravel"], &["MySQL", "JavaScript"], Beginner),
    skill("Kotlin", "Programming Languages", "Mobile", &[], &["Java", "Swift"], Intermediate),
    skill("Swift", "Programming Languages", "Mobile", &["swiftui"], &["Kotlin"], Intermediate),
    skill("Scala", "Programming Languages", "Backend", &[], &["Java", "Spark"], Advanced),
    skill("R", "Programming Languages", "Data", &["rstudio"], &["Python", "Data Science"], Intermediate),
    // Web frameworks
    skill("React", "Web Frameworks", "Frontend", &["reactjs", "react.js"], &["JavaScript", "TypeScript", "Node.js"], Intermediate),
    skill("Angular", "Web Frameworks", "Frontend", &["angularjs"], &["TypeScript", "React"], Intermediate),
    skill("Vue", "Web Frameworks", "Frontend", &["vuejs", "vue.js"], &["JavaScript", "React"], Intermediate),
    skill("Node.js", "Web Frameworks", "Backend", &["nodejs"], &["JavaScript", "Express.js"], Intermediate),
    skill("Express.js", "Web Frameworks", "Backend", &["expressjs"], &["Node.js"], Beginner),
    skill("Django", "Web Frameworks", "Backend", &[], &["Python", "Flask"], Intermediate),
    skill("Flask", "Web Frameworks", "Backend", &[], &["Python", "Django"], Beginner),
    skill("Spring Boot", "Web Frameworks", "Backend", &["spring framework"], &["Java", "Microservices"], Intermediate),
    // Databases
    skill("SQL", "Databases", "Relational", &["mysql", "postgresql", "postgres", "sqlite", "t-sql"], &["MongoDB", "Redis"], Beginner),
    skill("MongoDB", "Databases", "NoSQL", &["mongo"], &["SQL", "Redis"], Intermediate),
    skill("Redis", "Databases", "NoSQL", &[], &["MongoDB", "SQL"], Intermediate),
    // Cloud and DevOps
    skill("AWS", "Cloud & DevOps", "Cloud", &["amazon web services", "ec2", "s3", "lambda"], &["Azure", "GCP", "Terraform"], Intermediate),
    skill("Azure", "Cloud & DevOps", "Cloud", &["microsoft azure"], &["AWS", "GCP"], Intermediate),
    skill("GCP", "Cloud & DevOps", "Cloud", &["google cloud", "google cloud platform"], &["AWS", "Azure"], Intermediate),
    skill("Docker", "Cloud & DevOps", "Containers", &["containerization"], &["Kubernetes", "CI/CD"], Intermediate),
    skill("Kubernetes", "Cloud & DevOps", "Containers", &["k8s"], &["Docker", "Terraform"], Advanced),
    skill("Terraform", "Cloud & DevOps", "Infrastructure", &["infrastructure as code", "iac"], &["AWS", "Kubernetes"], Intermediate),
    skill("CI/CD", "Cloud & DevOps", "Automation", &["continuous integration", "continuous delivery", "jenkins", "github actions"], &["Docker", "Git", "DevOps"], Intermediate),
    skill("DevOps", "Cloud & DevOps", "Automation", &["site reliability", "sre"], &["CI/CD", "Docker", "Kubernetes"], Intermediate),
    skill("Linux", "Cloud & DevOps", "Systems", &["unix", "bash", "shell scripting"], &["Docker", "Git"], Beginner),
    // Data science
    skill("Machine Learning", "Data Science", "Modeling", &["ml"], &["Python", "Deep Learning", "TensorFlow", "PyTorch"], Advanced),
    skill("Deep Learning", "Data Science", "Modeling", &["neural networks"], &["Machine Learning", "PyTorch", "TensorFlow"], Advanced),
    skill("Data Science", "Data Science", "Analysis", &["data analysis", "data analytics"], &["Python", "SQL", "Machine Learning"], Intermediate),
    skill("NLP", "Data Science", "Modeling", &["natural language processing"], &["Machine Learning", "Deep Learning"], Advanced),
    skill("Computer Vision", "Data Science", "Modeling", &["image processing"], &["Deep Learning", "PyTorch"], Advanced),
    skill("AI", "Data Science", "Modeling", &["artificial intelligence"], &["Machine Learning", "Deep Learning"], Advanced),
    skill("TensorFlow", "Data Science", "Frameworks", &["keras"], &["PyTorch", "Machine Learning"], Advanced),
    skill("PyTorch", "Data Science", "Frameworks", &["torch"], &["TensorFlow", "Deep Learning"], Advanced),
    skill("Pandas", "Data Science", "Libraries", &["numpy"], &["Python", "Data Science"], Beginner),
    skill("Spark", "Data Science", "Big Data", &["apache spark", "pyspark", "hadoop"], &["Scala", "Python"], Advanced),
    skill("Tableau", "Data Science", "Visualization", &["power bi", "looker"], &["Excel", "SQL"], Beginner),
    skill("Excel", "Tools", "Office", &["microsoft excel", "spreadsheets"], &["Tableau", "SQL"], Beginner),
    // Tools, APIs, methodologies
    skill("Git", "Tools", "Version Control", &["github", "gitlab", "version control"], &["CI/CD"], Beginner),
    skill("REST APIs", "Tools", "APIs", &["restful", "rest api", "restful apis"], &["GraphQL", "Microservices"], Intermediate),
    skill("GraphQL", "Tools", "APIs", &[], &["REST APIs"], Intermediate),
    skill("Microservices", "Tools", "Architecture", &["microservice", "distributed systems"], &["Docker", "Kubernetes", "REST APIs"], Advanced),
    skill("Agile", "Methodologies", "Process", &["kanban"], &["Scrum"], Beginner),
    skill("Scrum", "Methodologies", "Process", &["scrum master"], &["Agile"], Beginner),
];

/// Dictionary words that are also everyday English; only matched when listed
/// explicitly in a skills section, never by free-text scanning.
const UNSCANNED: &[&str] = &["excel", "swift", "scala", "rails", "torch", "lambda", "spark"];

/// Lowercased name or alias → taxonomy entry.
static INDEX: Lazy<HashMap<String, &'static SkillInfo>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for info in SKILLS {
        index.insert(info.name.to_lowercase(), info);
        for alias in info.aliases {
            index.entry(alias.to_lowercase()).or_insert(info);
        }
    }
    index
});

/// Direct or alias lookup, case-insensitive.
pub fn lookup(skill: &str) -> Option<&'static SkillInfo> {
    INDEX.get(skill.trim().to_lowercase().as_str()).copied()
}

/// Canonical display name for a skill, or the trimmed input when unknown.
pub fn canonical_name(skill: &str) -> String {
    match lookup(skill) {
        Some(info) => info.name.to_string(),
        None => skill.trim().to_string(),
    }
}

pub fn related_skills(skill: &str) -> &'static [&'static str] {
    lookup(skill).map(|info| info.related).unwrap_or(&[])
}

/// Every name and alias usable for free-text scanning, paired with its canonical name.
///
/// Very short purely alphabetic terms ("Go", "R", "ml") are left out; they collide
/// with ordinary words and initials.
pub fn scan_terms() -> &'static [(String, &'static str)] {
    static TERMS: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
        let mut terms = Vec::new();
        for info in SKILLS {
            for term in std::iter::once(&info.name).chain(info.aliases.iter()) {
                let lower = term.to_lowercase();
                let ambiguous = (lower.len() < 3 && lower.chars().all(|c| c.is_ascii_alphabetic()))
                    || UNSCANNED.contains(&lower.as_str());
                if !ambiguous {
                    terms.push((lower, info.name));
                }
            }
        }
        // longest first so "spring boot" claims the span before "spring"
        terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        terms
    });
    &TERMS
}

// ────────────────────────────────────────────────────────────────────────────
// Skill gap analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillSuggestion {
    pub missing_skill: String,
    /// Related skills the candidate already lists, useful as a bridge.
    pub related_you_have: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillGapAnalysis {
    pub matched: Vec<String>,
    pub missing_by_category: BTreeMap<String, Vec<String>>,
    pub suggestions: Vec<SkillSuggestion>,
    /// Fraction of job skills the candidate covers, 0.0 – 1.0.
    pub coverage: f64,
}

/// Compares candidate skills with job skills after canonicalisation.
pub fn analyze_skill_gaps<'a>(
    resume_skills: &BTreeSet<String>,
    job_skills: impl IntoIterator<Item = &'a str>,
) -> SkillGapAnalysis {
    let have: BTreeSet<String> = resume_skills.iter().map(|s| canonical_key(s)).collect();
    let wanted: BTreeSet<String> = job_skills.into_iter().map(canonical_name).collect();

    let mut matched = Vec::new();
    let mut missing_by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut suggestions = Vec::new();

    for skill in &wanted {
        if have.contains(&canonical_key(skill)) {
            matched.push(skill.clone());
            continue;
        }

        let category = lookup(skill)
            .map(|info| info.category.to_string())
            .unwrap_or_else(|| "Other".to_string());
        missing_by_category
            .entry(category)
            .or_default()
            .push(skill.clone());

        let related_you_have: Vec<String> = related_skills(skill)
            .iter()
            .filter(|r| have.contains(&r.to_lowercase()))
            .map(|r| r.to_string())
            .collect();
        if !related_you_have.is_empty() {
            suggestions.push(SkillSuggestion {
                missing_skill: skill.clone(),
                related_you_have,
            });
        }
    }

    let coverage = if wanted.is_empty() {
        0.0
    } else {
        matched.len() as f64 / wanted.len() as f64
    };

    SkillGapAnalysis {
        matched,
        missing_by_category,
        suggestions,
        coverage,
    }
}

fn canonical_key(skill: &str) -> String {
    canonical_name(skill).to_lowercase()
}
