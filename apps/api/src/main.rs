use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scorecard_api::config::Config;
use scorecard_api::llm_client::{self, LlmClient};
use scorecard_api::matching::LlmResponsibilityJudge;
use scorecard_api::routes::build_router;
use scorecard_api::scoring::ScoringConfig;
use scorecard_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: a missing API key stops startup here.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("scorecard_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scorecard API v{}", env!("CARGO_PKG_VERSION"));

    let synonyms = config.synonym_table()?;
    info!(groups = synonyms.len(), "Synonym table ready");

    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build HTTP client for the LLM")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let scoring = ScoringConfig::default();
    scoring.validate()?;

    let state = AppState {
        match_config: config.match_config(),
        config: config.clone(),
        synonyms: Arc::new(synonyms),
        scoring,
        judge: Arc::new(LlmResponsibilityJudge(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
