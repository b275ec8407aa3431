use footprint_lens::config::Config;
use footprint_lens::gemini_client::GeminiClient;
use footprint_lens::handlers::{app_router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration (the Gemini API key is
/// mandatory), builds the inference client and serves the router.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footprint_lens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing API key stops startup here
    let config = Config::from_env()?;

    let gemini_client = GeminiClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize Gemini client: {}", e))?;
    tracing::info!(
        "✓ Gemini client initialized: {} ({})",
        config.gemini_base_url,
        gemini_client.model()
    );

    let port = config.port;
    let app_state = Arc::new(AppState { gemini_client });

    let app = app_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
