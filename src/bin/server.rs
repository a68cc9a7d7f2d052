use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_duel_engine::api::{router, AppState};
use movie_duel_engine::{EngineConfig, GameEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_duel_server=debug,movie_duel_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();

    tracing::info!("🚀 Starting Movie Duel Server");
    tracing::info!("🔑 TMDb API key loaded: {}", config.has_api_key());
    tracing::info!("📦 Cache: {}", if config.cache_enabled { config.db_path.as_str() } else { "disabled" });
    tracing::info!("🔌 Port: {}", config.port);

    if !config.has_api_key() {
        tracing::warn!("⚠️ TMDB_API_KEY is not set, provider calls will be rejected");
    }

    let engine = GameEngine::from_config(&config).await?;
    tracing::info!("🎞️ Provider: {}", engine.provider_name());
    let state = AppState::new(Arc::new(engine), config.has_api_key());

    let app = router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🎬 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
