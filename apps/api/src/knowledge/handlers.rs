use std::collections::BTreeSet;

use axum::{extract::Path, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::knowledge::industry::{industries, IndustryProfile};
use crate::knowledge::taxonomy::{analyze_skill_gaps, lookup, SkillGapAnalysis, SkillInfo};

#[derive(Deserialize)]
pub struct SkillGapRequest {
    pub resume_skills: BTreeSet<String>,
    pub job_skills: Vec<String>,
}

/// GET /api/v1/knowledge/skills/:name
pub async fn handle_get_skill(Path(name): Path<String>) -> Result<Json<SkillInfo>, AppError> {
    lookup(&name)
        .copied()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Skill '{name}' is not in the taxonomy")))
}

/// POST /api/v1/knowledge/skill-gaps
pub async fn handle_skill_gaps(Json(req): Json<SkillGapRequest>) -> Json<SkillGapAnalysis> {
    Json(analyze_skill_gaps(
        &req.resume_skills,
        req.job_skills.iter().map(String::as_str),
    ))
}

/// GET /api/v1/knowledge/industries
pub async fn handle_list_industries() -> Json<&'static [IndustryProfile]> {
    Json(industries())
}
