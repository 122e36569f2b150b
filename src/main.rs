use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use profinder::config::AppConfig;
use profinder::handlers;
use profinder::services::backend::http::HttpBackend;
use profinder::services::booking::simulated::SimulatedSubmitter;
use profinder::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    tracing::info!("using recommendation backend at {}", config.backend_url);
    let backend = Arc::new(HttpBackend::new(&config)?);
    let submitter = Arc::new(SimulatedSubmitter::new(config.submit_delay));

    let state = Arc::new(AppState::new(config.clone(), backend, submitter));

    // Suggestions load independently of the first search.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state.options.activate().await;
        });
    }

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
