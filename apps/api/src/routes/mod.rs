pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::credits::handlers as credits;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Skill Analysis API
        .route(
            "/api/v1/skill-analysis/comprehensive",
            post(matching::handle_comprehensive),
        )
        .route("/api/v1/skill-analysis/fast", post(matching::handle_fast))
        .route(
            "/api/v1/skill-analysis/ai-powered",
            post(matching::handle_ai_powered),
        )
        // Credits API
        .route("/api/v1/credits/check", post(credits::handle_check))
        .route("/api/v1/credits/deduct", post(credits::handle_deduct))
        .route("/api/v1/credits/add", post(credits::handle_add))
        .route("/api/v1/credits/history", post(credits::handle_history))
        .with_state(state)
}
