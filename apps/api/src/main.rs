mod analysis;
mod config;
mod errors;
mod ingest;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionBackend, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));
    info!("ANTHROPIC_API_KEY: {}", config.masked_api_key());

    let llm = build_llm(&config)?;
    if llm.is_none() {
        warn!("No usable API key; every analysis will use the fallback generator");
    }

    let state = AppState {
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_llm(config: &Config) -> Result<Option<Arc<dyn CompletionBackend>>> {
    let Some(api_key) = config.anthropic_api_key.clone() else {
        return Ok(None);
    };

    let client = LlmClient::new(
        api_key,
        config.llm_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
        Duration::from_millis(config.llm_retry_delay_ms),
    )?
    .with_endpoint(config.llm_api_url.clone());
    info!("LLM client initialized (model: {})", client.model());

    Ok(Some(Arc::new(client)))
}
