mod config;
mod credits;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::credits::ledger::InMemoryLedger;
use crate::llm_client::{CompletionProvider, LlmClient};
use crate::matching::SkillMatcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireMate API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion provider
    let provider: Arc<dyn CompletionProvider> = Arc::new(LlmClient::new(
        config.llm_api_url.clone(),
        config.llm_api_key.clone(),
    )?);
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        config.llm_model, config.llm_api_url
    );

    let matcher = SkillMatcher::new(provider, config.llm_model.clone());

    // Balances live in process memory and reset on restart
    let ledger = Arc::new(InMemoryLedger::new(config.starting_credits));
    info!(
        "Credit ledger initialized ({} starting credits)",
        config.starting_credits
    );

    let state = AppState { matcher, ledger };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
