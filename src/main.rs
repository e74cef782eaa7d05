use std::env;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resume_analyzer::{create_router, AppState, Config, MODEL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "resume_analyzer=debug,tower_http=debug,axum::rejection=trace".into());

    if env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting Resume Analyzer Service");
    tracing::info!("Model: {} via {}", MODEL, config.gemini_base_url);
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Chat request timeout: {}s", config.request_timeout_seconds);

    // Determine port from environment (Railway compatibility)
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server_port);

    let addr = format!("{}:{}", config.server_host, port);

    let app = create_router(AppState::from_config(config));

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
