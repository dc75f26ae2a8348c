use std::sync::Arc;

use anyhow::Context;
use moviefinder::{
    api::{create_router, AppState, SessionStore},
    config::Config,
    services::{
        providers::{OpenAiGenerator, TmdbProvider},
        MetadataResolver, Orchestrator,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let generator = Arc::new(OpenAiGenerator::from_config(&config));
    let resolver = match TmdbProvider::from_config(&config)? {
        Some(provider) => MetadataResolver::new(Arc::new(provider), config.tmdb_image_url.clone()),
        None => {
            tracing::warn!("TMDB_API_KEY not set; posters and release years are disabled");
            MetadataResolver::disabled()
        }
    };

    // Initialize application state
    let sessions = SessionStore::new(config.session_ttl(), config.max_sessions);
    let state = AppState::with_sessions(Orchestrator::new(generator, resolver), sessions);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, model = %config.openai_model, "MovieFinder listening");
    axum::serve(listener, app).await?;

    Ok(())
}
