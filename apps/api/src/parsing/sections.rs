//! Splits résumé text into titled sections by recognising heading lines.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Lines before the first heading: name and contact block.
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Other,
}

const HEADINGS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &["summary", "professional summary", "profile", "professional profile", "objective", "career objective", "about me", "about"],
    ),
    (
        SectionKind::Experience,
        &["experience", "work experience", "professional experience", "employment history", "work history", "employment", "relevant experience", "career history"],
    ),
    (
        SectionKind::Education,
        &["education", "academic background", "education and training", "education & training", "academics"],
    ),
    (
        SectionKind::Skills,
        &["skills", "technical skills", "core skills", "core competencies", "competencies", "technologies", "skills & tools", "skills and tools", "tools"],
    ),
    (
        SectionKind::Projects,
        &["projects", "personal projects", "key projects", "selected projects"],
    ),
    (
        SectionKind::Certifications,
        &["certifications", "certification", "certificates", "licenses & certifications", "licenses and certifications", "certifications & licenses"],
    ),
    (
        SectionKind::Other,
        &["awards", "honors", "publications", "volunteer", "volunteering", "interests", "hobbies", "references", "languages", "activities"],
    ),
];

const MAX_HEADING_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl Section {
    fn new(kind: SectionKind, heading: Option<String>) -> Self {
        Self {
            kind,
            heading,
            lines: Vec::new(),
        }
    }
}

/// Classifies a heading line, returning the kind and any content that followed
/// an inline colon ("Skills: Python, SQL").
pub fn classify_heading(line: &str) -> Option<(SectionKind, Option<String>)> {
    let trimmed = line.trim().trim_start_matches(['#', '*', '=', '-']).trim();
    if trimmed.is_empty() {
        return None;
    }

    let (head, rest) = match trimmed.split_once(':') {
        Some((head, rest)) => (head, Some(rest.trim())),
        None => (trimmed, None),
    };
    if head.len() > MAX_HEADING_LEN {
        return None;
    }

    let normalized = head
        .trim()
        .trim_end_matches(['*', '='])
        .to_lowercase();
    let kind = HEADINGS
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(kind, _)| *kind)?;

    let inline = rest.filter(|r| !r.is_empty()).map(str::to_string);
    Some((kind, inline))
}

/// Splits text into sections. Lines before the first heading land in `Header`.
/// Blank lines are dropped.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = vec![Section::new(SectionKind::Header, None)];

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((kind, inline)) = classify_heading(line) {
            // "Languages: Rust, Go" inside a skills block is a sub-label, not a new section
            if let Some(current) = sections.last_mut() {
                if current.kind == SectionKind::Skills && inline.is_some() {
                    current.lines.push(line.trim().to_string());
                    continue;
                }
            }
            let mut section = Section::new(kind, Some(line.trim().to_string()));
            if let Some(content) = inline {
                section.lines.push(content);
            }
            sections.push(section);
            continue;
        }
        if let Some(current) = sections.last_mut() {
            current.lines.push(line.trim().to_string());
        }
    }

    sections
}

/// All lines from every section of `kind`, in document order.
pub fn lines_of(sections: &[Section], kind: SectionKind) -> Vec<&str> {
    sections
        .iter()
        .filter(|s| s.kind == kind)
        .flat_map(|s| s.lines.iter().map(String::as_str))
        .collect()
}
