//! Axum route handlers for the Skill Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::credits::ledger::CreditTransaction;
use crate::credits::ActionType;
use crate::errors::AppError;
use crate::matching::models::AnalysisResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SkillAnalysisRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub job_skills: Vec<String>,
    #[serde(default)]
    pub resume_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisCounts {
    pub total_job_skills: usize,
    pub total_resume_skills: usize,
    pub matched_count: usize,
    pub missing_count: usize,
    pub bonus_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CreditInfo {
    pub credits_used: i64,
    pub credits_remaining: i64,
    pub transaction_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SkillAnalysisResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub summary: AnalysisCounts,
    pub credit_info: CreditInfo,
}

/// Which matcher entry point a request runs.
#[derive(Debug, Clone, Copy)]
enum Stage {
    Hybrid,
    RuleBased,
    AiOnly,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skill-analysis/comprehensive
///
/// Rule-based pass plus an AI pass for unresolved skills.
pub async fn handle_comprehensive(
    State(state): State<AppState>,
    Json(request): Json<SkillAnalysisRequest>,
) -> Result<Json<SkillAnalysisResponse>, AppError> {
    run_analysis(&state, request, Stage::Hybrid).await.map(Json)
}

/// POST /api/v1/skill-analysis/fast
///
/// Rule-based pass only. Never calls the completion provider.
pub async fn handle_fast(
    State(state): State<AppState>,
    Json(request): Json<SkillAnalysisRequest>,
) -> Result<Json<SkillAnalysisResponse>, AppError> {
    run_analysis(&state, request, Stage::RuleBased).await.map(Json)
}

/// POST /api/v1/skill-analysis/ai-powered
///
/// AI pass over every required skill.
pub async fn handle_ai_powered(
    State(state): State<AppState>,
    Json(request): Json<SkillAnalysisRequest>,
) -> Result<Json<SkillAnalysisResponse>, AppError> {
    run_analysis(&state, request, Stage::AiOnly).await.map(Json)
}

/// Charges the caller, then runs the requested stage. Analysis cannot fail,
/// so a successful debit is never refunded.
async fn run_analysis(
    state: &AppState,
    request: SkillAnalysisRequest,
    stage: Stage,
) -> Result<SkillAnalysisResponse, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }

    let transaction = state
        .ledger
        .debit(&request.user_id, ActionType::SkillAnalysis)
        .await?;
    info!(
        "{:?} skill analysis for user {} ({} job skills, {} resume skills)",
        stage,
        request.user_id,
        request.job_skills.len(),
        request.resume_skills.len()
    );

    let job_skills = &request.job_skills;
    let resume_skills = &request.resume_skills;
    let result = match stage {
        Stage::Hybrid => state.matcher.analyze(job_skills, resume_skills).await,
        Stage::RuleBased => state.matcher.analyze_rule_based(job_skills, resume_skills),
        Stage::AiOnly => state.matcher.analyze_ai_only(job_skills, resume_skills).await,
    };

    Ok(build_response(&request, result, &transaction))
}

fn build_response(
    request: &SkillAnalysisRequest,
    result: AnalysisResult,
    transaction: &CreditTransaction,
) -> SkillAnalysisResponse {
    let summary = AnalysisCounts {
        total_job_skills: request.job_skills.len(),
        total_resume_skills: request.resume_skills.len(),
        matched_count: result.matched_skills.len(),
        missing_count: result.missing_skills.len(),
        bonus_count: result.bonus_skills.len(),
    };

    SkillAnalysisResponse {
        result,
        summary,
        credit_info: CreditInfo {
            credits_used: -transaction.amount,
            credits_remaining: transaction.balance_after,
            transaction_id: transaction.id,
        },
    }
}
