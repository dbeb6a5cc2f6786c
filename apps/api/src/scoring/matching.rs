//! Case-insensitive term matching with light suffix stemming and taxonomy aliases.

use std::collections::BTreeSet;

use crate::knowledge::taxonomy::canonical_name;

const SUFFIXES: &[&str] = &["ing", "ed", "s"];
const MIN_STEM_LEN: usize = 3;

/// Strips one common English suffix ("managing" → "manag", "APIs" → "api").
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    for suffix in SUFFIXES {
        if let Some(base) = lower.strip_suffix(suffix) {
            if base.chars().count() >= MIN_STEM_LEN && !base.ends_with('s') {
                return base.to_string();
            }
        }
    }
    lower
}

/// Splits into lowercase tokens. `+` and `#` stay attached so "c++" and "c#" survive.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

pub fn stem_phrase(phrase: &str) -> Vec<String> {
    tokenize(phrase).iter().map(|t| stem(t)).collect()
}

/// True when `term` occurs in `haystack` on word boundaries. Both must already be lowercase.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(term) {
        let begin = start + pos;
        let end = begin + term.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Stemmed token stream of a text, searchable for multi-word phrases.
#[derive(Debug, Clone)]
pub struct StemmedText {
    tokens: Vec<String>,
}

impl StemmedText {
    pub fn new(text: &str) -> Self {
        Self {
            tokens: stem_phrase(text),
        }
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let needle = stem_phrase(phrase);
        if needle.is_empty() || needle.len() > self.tokens.len() {
            return false;
        }
        self.tokens.windows(needle.len()).any(|w| w == needle.as_slice())
    }
}

/// Matches job skills against a candidate's skill set.
///
/// A skill matches when its canonical name (after alias resolution) or its
/// stemmed form equals one of the candidate's.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    canonical: BTreeSet<String>,
    stemmed: BTreeSet<Vec<String>>,
}

impl SkillMatcher {
    pub fn new<'a>(skills: impl IntoIterator<Item = &'a String>) -> Self {
        let mut canonical = BTreeSet::new();
        let mut stemmed = BTreeSet::new();
        for skill in skills {
            if skill.trim().is_empty() {
                continue;
            }
            canonical.insert(canonical_name(skill).to_lowercase());
            stemmed.insert(stem_phrase(skill));
        }
        Self { canonical, stemmed }
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn matches(&self, skill: &str) -> bool {
        if skill.trim().is_empty() {
            return false;
        }
        self.canonical
            .contains(&canonical_name(skill).to_lowercase())
            || self.stemmed.contains(&stem_phrase(skill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stem_common_suffixes() {
        assert_eq!(stem("Managing"), "manag");
        assert_eq!(stem("managed"), "manag");
        assert_eq!(stem("APIs"), "api");
        assert_eq!(stem("class"), "class");
        assert_eq!(stem("is"), "is");
    }

    #[test]
    fn test_tokenize_keeps_language_symbols() {
        assert_eq!(tokenize("C++, C# and Node.js"), vec!["c++", "c#", "and", "node", "js"]);
    }

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("expert in java and sql", "java"));
        assert!(!contains_term("expert in javascript", "java"));
        assert!(contains_term("wrote c++ services", "c++"));
        assert!(contains_term("ci/cd pipelines", "ci/cd"));
        assert!(!contains_term("reactive systems", "react"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_contains_term_finds_later_occurrence() {
        assert!(contains_term("javascript then java", "java"));
    }

    #[test]
    fn test_stemmed_text_phrase_match() {
        let text = StemmedText::new("Led teams building distributed systems for payments");
        assert!(text.contains_phrase("distributed system"));
        assert!(text.contains_phrase("build"));
        assert!(!text.contains_phrase("machine learning"));
        assert!(!text.contains_phrase(""));
    }

    #[test]
    fn test_skill_matcher_case_insensitive() {
        let skills = set(&["python", "SQL"]);
        let matcher = SkillMatcher::new(&skills);
        assert!(matcher.matches("Python"));
        assert!(matcher.matches("sql"));
        assert!(!matcher.matches("AWS"));
    }

    #[test]
    fn test_skill_matcher_aliases_and_stems() {
        let skills = set(&["golang", "REST API"]);
        let matcher = SkillMatcher::new(&skills);
        assert!(matcher.matches("Go"));
        assert!(matcher.matches("REST APIs"));
        assert!(!matcher.matches(""));
    }
}
