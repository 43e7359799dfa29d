//! Axum route handlers for the Credits API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::credits::ledger::CreditTransaction;
use crate::credits::ActionType;
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CreditCheckRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreditCheckResponse {
    pub user_id: String,
    pub credits: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeductRequest {
    #[serde(default)]
    pub user_id: String,
    pub action_type: ActionType,
}

#[derive(Debug, Deserialize)]
pub struct AddCreditsRequest {
    #[serde(default)]
    pub user_id: String,
    pub credits_to_add: i64,
    #[serde(default = "default_reason")]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction: CreditTransaction,
    pub credits: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub transactions: Vec<CreditTransaction>,
}

fn default_reason() -> String {
    "manual_addition".to_string()
}

fn require_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }
    Ok(())
}

/// POST /api/v1/credits/check
pub async fn handle_check(
    State(state): State<AppState>,
    Json(request): Json<CreditCheckRequest>,
) -> Result<Json<CreditCheckResponse>, AppError> {
    require_user_id(&request.user_id)?;
    let credits = state.ledger.balance(&request.user_id).await;
    Ok(Json(CreditCheckResponse {
        user_id: request.user_id,
        credits,
    }))
}

/// POST /api/v1/credits/deduct
///
/// Charges the cost of `action_type`. Returns 402 when the balance is too low.
pub async fn handle_deduct(
    State(state): State<AppState>,
    Json(request): Json<DeductRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    require_user_id(&request.user_id)?;
    let transaction = state
        .ledger
        .debit(&request.user_id, request.action_type)
        .await?;
    Ok(Json(TransactionResponse {
        credits: transaction.balance_after,
        transaction,
    }))
}

/// POST /api/v1/credits/add
pub async fn handle_add(
    State(state): State<AppState>,
    Json(request): Json<AddCreditsRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    require_user_id(&request.user_id)?;
    let transaction = state
        .ledger
        .credit(&request.user_id, request.credits_to_add, &request.reason)
        .await?;
    Ok(Json(TransactionResponse {
        credits: transaction.balance_after,
        transaction,
    }))
}

/// POST /api/v1/credits/history
pub async fn handle_history(
    State(state): State<AppState>,
    Json(request): Json<HistoryRequest>,
) -> Result<Json<HistoryResponse>, AppError> {
    require_user_id(&request.user_id)?;
    let limit = request.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let transactions = state.ledger.history(&request.user_id, limit).await;
    Ok(Json(HistoryResponse {
        user_id: request.user_id,
        transactions,
    }))
}
