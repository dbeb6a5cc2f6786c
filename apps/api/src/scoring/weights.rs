use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::models::Category;

const SUM_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeightsError {
    #[error("category weights must sum to 1.0 (got {0:.3})")]
    BadSum(f64),

    #[error("category weight for {0} must be within [0, 1]")]
    OutOfRange(&'static str),
}

/// Share of each category in the final score. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub technical_skills: f64,
    pub soft_skills: f64,
    pub experience: f64,
    pub education: f64,
    pub keywords: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            technical_skills: 0.25,
            soft_skills: 0.20,
            experience: 0.25,
            education: 0.15,
            keywords: 0.15,
        }
    }
}

impl ScoringWeights {
    /// Builds a weight set, rejecting negative entries and sums away from 1.0.
    pub fn new(
        technical_skills: f64,
        soft_skills: f64,
        experience: f64,
        education: f64,
        keywords: f64,
    ) -> Result<Self, WeightsError> {
        let weights = Self {
            technical_skills,
            soft_skills,
            experience,
            education,
            keywords,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        for category in Category::ALL {
            let w = self.get(category);
            if !(0.0..=1.0).contains(&w) {
                return Err(WeightsError::OutOfRange(category.label()));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }
        Ok(())
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::TechnicalSkills => self.technical_skills,
            Category::SoftSkills => self.soft_skills,
            Category::Experience => self.experience,
            Category::Education => self.education,
            Category::Keywords => self.keywords,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}
