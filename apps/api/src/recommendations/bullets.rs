//! Achievement bullet review: is the impact quantified, and is the verb weak?

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletReview {
    pub quantified: bool,
    /// First weak phrase found, if any ("responsible for", "helped").
    pub weak_phrase: Option<String>,
    pub vague_scale: Option<String>,
}

impl BulletReview {
    pub fn is_strong(&self) -> bool {
        self.quantified && self.weak_phrase.is_none()
    }
}

const WEAK_PHRASES: &[&str] = &[
    "responsible for",
    "helped",
    "worked on",
    "assisted",
    "participated in",
    "involved in",
    "duties included",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "numerous",
    "various",
    "several",
];

/// Quantified means a digit, a percentage, a currency sign or an "Nx" multiplier.
pub fn review_bullet(text: &str) -> BulletReview {
    let lower = text.to_lowercase();

    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains(['$', '€', '£']);
    let quantified = has_digit || has_percent || has_currency;

    let weak_phrase = WEAK_PHRASES
        .iter()
        .find(|p| lower.contains(*p))
        .map(|p| p.to_string());
    let vague_scale = if quantified {
        None
    } else {
        VAGUE_SCALE_WORDS
            .iter()
            .find(|w| lower.split(|c: char| !c.is_alphanumeric()).any(|t| t == **w))
            .map(|w| w.to_string())
    };

    BulletReview {
        quantified,
        weak_phrase,
        vague_scale,
    }
}

/// Reviews every non-empty line of an experience description.
pub fn review_description(description: &str) -> Vec<BulletReview> {
    description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(review_bullet)
        .collect()
}
