//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::{analyze, validate_job_description, AnalysisReport};
use crate::errors::AppError;
use crate::matching::{SkillComparator, SkillComparison};
use crate::models::{NormalizedResume, ParsedJobDescription};
use crate::scoring::RecoveryItem;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_description: ParsedJobDescription,
    pub resume: NormalizedResume,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,
    /// The first `RECOVERY_DISPLAY_LIMIT` items of the recovery plan.
    pub top_recovery_items: Vec<RecoveryItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillComparisonResponse {
    pub skill_comparison: SkillComparison,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Full pipeline: skill comparison, responsibility matching, score,
/// recovery plan and resume feedback.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let report = analyze(
        &request.job_description,
        &request.resume,
        &state.analysis_deps(),
    )
    .await?;

    let top_recovery_items = report
        .recovery_plan
        .displayed(state.config.recovery_display_limit)
        .to_vec();

    Ok(Json(AnalyzeResponse {
        report,
        top_recovery_items,
    }))
}

/// POST /api/v1/analysis/skills
///
/// Skill comparison only. Deterministic and never calls the judge.
pub async fn handle_skill_comparison(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SkillComparisonResponse>, AppError> {
    validate_job_description(&request.job_description)?;

    let skill_comparison = SkillComparator::new(&state.synonyms, &state.match_config)
        .compare(&request.job_description, &request.resume);

    Ok(Json(SkillComparisonResponse { skill_comparison }))
}
