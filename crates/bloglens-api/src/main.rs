//! Bloglens API Server
//!
//! REST API server for blog post summary generation and semantic search.

use bloglens_api::{create_router, state::AppState};
use bloglens_core::config::AppConfig;
use bloglens_core::{EmbeddingModel, PostStore, TextModel};
use bloglens_engine::{SemanticSearch, Summarizer};
use bloglens_gemini::GeminiClient;
use bloglens_store::TablesDbClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json_format {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Build the upstream clients
    let gemini = Arc::new(GeminiClient::from_config(&config.gemini)?);
    let store = Arc::new(TablesDbClient::from_config(&config.appwrite)?);

    // Wire the pipelines
    let summarizer = Summarizer::new(
        gemini.clone() as Arc<dyn TextModel>,
        config.summary.clone(),
    );
    let search = SemanticSearch::new(
        gemini as Arc<dyn EmbeddingModel>,
        store as Arc<dyn PostStore>,
        config.search.clone(),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::new(config, summarizer, search));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Bloglens API server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
